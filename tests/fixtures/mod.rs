pub mod formulas;
pub mod signals;
