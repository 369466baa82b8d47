pub mod classify;
pub mod coadd;
pub mod consts;
pub mod convert;
pub mod datescan;
pub mod detector;
pub mod error;
pub mod layout;
pub mod molecule;
pub mod pipeline;
pub mod reduce;
pub mod residuals;
pub mod services;
pub mod store;
pub mod summary;
pub mod workspace;
