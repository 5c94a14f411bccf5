pub mod client;
pub mod error;
pub mod model;

pub use client::CompaniesApi;
pub use error::CompaniesError;
pub use model::{
    Company, CompanyUpdate, Employee, EmployeePatch, EmployeeUpdate, NewCompany, NewEmployee,
};
