pub(crate) mod date;

pub(crate) use date::{parse_cell_date, parse_date};
