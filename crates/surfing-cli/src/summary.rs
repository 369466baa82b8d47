use std::path::PathBuf;

use console::Style;
use surfing_core::coadd::CoaddOutcome;
use surfing_core::datescan::Datescan;
use surfing_core::detector::Polarization;
use surfing_core::layout::ProductLayout;
use surfing_core::pipeline::config::PipelineConfig;
use surfing_core::pipeline::PipelineReport;
use surfing_core::reduce::ReductionRecord;
use surfing_core::residuals::ResidualOutcome;
use surfing_core::summary::{display_path, render_summary};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

fn print_title(s: &Styles, title: &str) {
    println!();
    println!("  {}", s.title.apply_to(title));
    println!(
        "  {}",
        s.title
            .apply_to("\u{2550}".repeat(title.chars().count()))
    );
    println!();
}

pub fn print_run_plan(config: &PipelineConfig) {
    let s = Styles::new();
    print_title(&s, "SURFING Reduction");

    println!(
        "  {:<14}{}",
        s.label.apply_to("Region"),
        s.value.apply_to(&config.region)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Root"),
        s.path.apply_to(config.layout().root().display())
    );
    let datescans: Vec<String> = config.datescans.iter().map(ToString::to_string).collect();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Datescans"),
        s.value.apply_to(datescans.join(", "))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Recipe"),
        s.method.apply_to(&config.recipe)
    );
    match config.recpars() {
        Some(parfile) => println!(
            "  {:<14}{}",
            s.label.apply_to("Parameters"),
            s.path.apply_to(parfile.display())
        ),
        None => println!(
            "  {:<14}{}",
            s.label.apply_to("Parameters"),
            s.disabled.apply_to("recipe defaults")
        ),
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Starlink"),
        s.path.apply_to(config.starlink.star_dir.display())
    );
    println!();

    println!("  {}", s.header.apply_to("Molecules"));
    for molecule in &config.molecules {
        println!(
            "    {:<12}{}",
            s.label.apply_to(&molecule.name),
            s.value.apply_to(format!("subband {}", molecule.subband))
        );
    }
    println!();
}

pub fn print_reductions(records: &[ReductionRecord]) {
    let s = Styles::new();
    for record in records {
        let pol = record
            .polarization
            .map(|p| p.to_string())
            .unwrap_or_else(|| "P0+P1".into());
        println!(
            "  {:<14}{:<6}{} products in {}",
            s.label.apply_to(record.datescan.to_string()),
            s.method.apply_to(pol),
            s.value.apply_to(record.output.datafiles.len()),
            s.path.apply_to(record.output_dir.display())
        );
    }
}

pub fn print_residuals(outcomes: &[ResidualOutcome]) {
    let s = Styles::new();
    for outcome in outcomes {
        match outcome {
            ResidualOutcome::Computed {
                datescan,
                molecule,
                path,
            } => println!(
                "  {:<14}{:<6}{}",
                s.label.apply_to(datescan.to_string()),
                s.value.apply_to(molecule),
                s.path.apply_to(path.display())
            ),
            ResidualOutcome::Skipped {
                datescan,
                molecule,
                missing,
            } => {
                let missing: Vec<String> = missing.iter().map(Polarization::to_string).collect();
                println!(
                    "  {:<14}{:<6}{}",
                    s.label.apply_to(datescan.to_string()),
                    s.value.apply_to(molecule),
                    s.disabled
                        .apply_to(format!("skipped, no {} moment 0 map", missing.join("/")))
                );
            }
        }
    }
}

pub fn print_coadds(outcomes: &[CoaddOutcome]) {
    let s = Styles::new();
    for outcome in outcomes {
        match outcome {
            CoaddOutcome::NoNewData { molecule } => println!(
                "  {:<14}{}",
                s.label.apply_to(molecule),
                s.disabled.apply_to("no new data")
            ),
            CoaddOutcome::Updated {
                molecule,
                inputs,
                merged_with_existing,
                sdf,
                ..
            } => {
                let action = if *merged_with_existing {
                    "merged"
                } else {
                    "created"
                };
                println!(
                    "  {:<14}{} {} from {} cube(s)",
                    s.label.apply_to(molecule),
                    s.path.apply_to(sdf.display()),
                    s.method.apply_to(action),
                    s.value.apply_to(inputs.len())
                );
            }
        }
    }
}

/// Echo the Summary.txt entries written by the combined reduction.
pub fn print_reduction_summary(records: &[ReductionRecord]) {
    println!();
    print!("{}", render_summary(records));
}

pub fn print_converted(files: &[PathBuf]) {
    let s = Styles::new();
    println!(
        "  {:<14}{}",
        s.label.apply_to("FITS written"),
        s.value.apply_to(files.len())
    );
}

pub fn print_report(report: &PipelineReport) {
    let s = Styles::new();
    print_title(&s, "Results");

    println!("  {}", s.header.apply_to("Reductions"));
    print_reductions(&report.combined);
    print_reductions(&report.individual);
    println!();

    println!("  {}", s.header.apply_to("Moment 0 residuals"));
    print_residuals(&report.residuals);
    println!();

    println!("  {}", s.header.apply_to("Co-adds"));
    print_coadds(&report.coadds);
    println!();

    print_converted(&report.converted);
}

pub fn print_paths(layout: &ProductLayout, config: &PipelineConfig, ds: &Datescan) {
    let s = Styles::new();
    print_title(&s, &format!("Layout for {ds}"));

    let row = |label: &str, path: PathBuf| {
        println!(
            "  {:<14}{}",
            s.label.apply_to(label),
            s.path.apply_to(display_path(&path))
        );
    };
    row("Raw", layout.raw_dir(ds));
    row("Reduced", layout.reduced_dir(ds));
    for pol in Polarization::ALL {
        row(&format!("Reduced {pol}"), layout.detector_dir(ds, pol));
    }
    row("Residuals", layout.residuals_dir(ds));
    row("Summary", layout.summary_path());
    println!();

    println!("  {}", s.header.apply_to("Co-adds"));
    for molecule in &config.molecules {
        println!(
            "    {:<12}{}",
            s.label.apply_to(&molecule.name),
            s.path
                .apply_to(layout.coadd_sdf(&config.region, molecule).display())
        );
    }
    println!();
}

pub fn print_banner() {
    println!("\n\n######################");
    println!("              ___            ___");
    println!("             /   \\          /   \\");
    println!("             \\_   \\        /  __/");
    println!("              _\\   \\      /  /__");
    println!("              \\___  \\____/   __/");
    println!("                  \\_       _/");
    println!("                    | @ @  \\_");
    println!("                    |        ");
    println!("                  _/     /\\  ");
    println!("                 /o)  (o/\\ \\_");
    println!("Done!            \\_____/ /   ");
    println!("Thanks, eh?!       \\____/    ");
    println!();
    println!("######################\n");
}
