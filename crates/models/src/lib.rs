pub mod errors;
pub mod db;
pub mod month_year;
pub mod subscription;

pub use month_year::MonthYear;

#[cfg(test)]
mod tests;
