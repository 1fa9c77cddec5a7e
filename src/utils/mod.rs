pub mod bits;
pub mod io;
