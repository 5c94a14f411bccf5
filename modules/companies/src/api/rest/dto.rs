use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::contract::model::{
    Company, CompanyUpdate, Employee, EmployeePatch, EmployeeUpdate, NewCompany, NewEmployee,
};

// Wire keys are the canonical field names (`Id`, `Name`, ...) so that full
// DTOs and shaped records look the same to clients. Lower-case aliases are
// accepted on input.

/// REST DTO for company representation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct CompanyDto {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub country: Option<String>,
}

/// REST DTO for employee representation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct EmployeeDto {
    pub id: Uuid,
    pub name: String,
    pub age: i32,
    pub position: String,
}

/// REST DTO for creating an employee (also nested in company creation)
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct CreateEmployeeReq {
    #[serde(default, alias = "name")]
    pub name: String,
    #[serde(default, alias = "age")]
    pub age: i32,
    #[serde(default, alias = "position")]
    pub position: String,
}

/// REST DTO for replacing an employee
pub type UpdateEmployeeReq = CreateEmployeeReq;

/// REST DTO for creating a company with optional initial employees
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct CreateCompanyReq {
    #[serde(default, alias = "name")]
    pub name: String,
    #[serde(default, alias = "address")]
    pub address: String,
    #[serde(default, alias = "country")]
    pub country: Option<String>,
    #[serde(default, alias = "employees")]
    pub employees: Vec<CreateEmployeeReq>,
}

/// REST DTO for replacing a company. Listed employees are added.
pub type UpdateCompanyReq = CreateCompanyReq;

/// Merge-style partial employee update: absent keys stay untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct PatchEmployeeReq {
    #[serde(default, alias = "name")]
    pub name: Option<String>,
    #[serde(default, alias = "age")]
    pub age: Option<i32>,
    #[serde(default, alias = "position")]
    pub position: Option<String>,
}

/// One RFC 6902 operation. Only `add`, `replace` and `remove` on the
/// employee's own fields are supported.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PatchOperation {
    pub op: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub value: Option<Value>,
}

/// PATCH body: a JSON Patch document or a merge object.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum PatchEmployeeBody {
    JsonPatch(Vec<PatchOperation>),
    Merge(PatchEmployeeReq),
}

impl PatchEmployeeBody {
    /// Fold the body into a domain patch. `Err` carries a client-facing reason.
    pub fn into_patch(self) -> Result<EmployeePatch, String> {
        match self {
            PatchEmployeeBody::Merge(req) => Ok(req.into()),
            PatchEmployeeBody::JsonPatch(ops) => {
                let mut patch = EmployeePatch::default();
                for op in ops {
                    op.apply(&mut patch)?;
                }
                Ok(patch)
            }
        }
    }
}

impl PatchOperation {
    fn apply(self, patch: &mut EmployeePatch) -> Result<(), String> {
        let field = self.path.trim_start_matches('/').to_ascii_lowercase();
        match self.op.to_ascii_lowercase().as_str() {
            // A removed field falls back to its empty value, which then fails
            // validation for every required field.
            "remove" => match field.as_str() {
                "name" => patch.name = Some(String::new()),
                "age" => patch.age = Some(0),
                "position" => patch.position = Some(String::new()),
                _ => return Err(format!("Unsupported patch path '{}'", self.path)),
            },
            "add" | "replace" => {
                let value = self
                    .value
                    .ok_or_else(|| format!("Operation '{}' on '{}' needs a value", self.op, self.path))?;
                match field.as_str() {
                    "name" => patch.name = Some(text_value(&self.path, value)?),
                    "position" => patch.position = Some(text_value(&self.path, value)?),
                    "age" => {
                        let age = value
                            .as_i64()
                            .and_then(|v| i32::try_from(v).ok())
                            .ok_or_else(|| format!("Value of '{}' must be an integer", self.path))?;
                        patch.age = Some(age);
                    }
                    _ => return Err(format!("Unsupported patch path '{}'", self.path)),
                }
            }
            other => return Err(format!("Unsupported patch operation '{other}'")),
        }
        Ok(())
    }
}

fn text_value(path: &str, value: Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(format!("Value of '{path}' must be a string")),
    }
}

// Conversion implementations between REST DTOs and contract models

impl From<Company> for CompanyDto {
    fn from(c: Company) -> Self {
        Self {
            id: c.id,
            name: c.name,
            address: c.address,
            country: c.country,
        }
    }
}

impl From<Employee> for EmployeeDto {
    fn from(e: Employee) -> Self {
        Self {
            id: e.id,
            name: e.name,
            age: e.age,
            position: e.position,
        }
    }
}

impl From<CreateEmployeeReq> for NewEmployee {
    fn from(req: CreateEmployeeReq) -> Self {
        Self {
            name: req.name,
            age: req.age,
            position: req.position,
        }
    }
}

impl From<CreateEmployeeReq> for EmployeeUpdate {
    fn from(req: CreateEmployeeReq) -> Self {
        NewEmployee::from(req).into()
    }
}

impl From<CreateCompanyReq> for NewCompany {
    fn from(req: CreateCompanyReq) -> Self {
        Self {
            name: req.name,
            address: req.address,
            country: req.country,
            employees: req.employees.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<CreateCompanyReq> for CompanyUpdate {
    fn from(req: CreateCompanyReq) -> Self {
        Self {
            name: req.name,
            address: req.address,
            country: req.country,
            employees: req.employees.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<PatchEmployeeReq> for EmployeePatch {
    fn from(req: PatchEmployeeReq) -> Self {
        Self {
            name: req.name,
            age: req.age,
            position: req.position,
        }
    }
}
