use uuid::Uuid;

/// Company as seen by other modules. Transport-agnostic: no serde here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub country: Option<String>,
}

/// Employee of exactly one company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub age: i32,
    pub position: String,
    pub company_id: Uuid,
}

/// Data for creating a company, optionally together with its first employees.
#[derive(Debug, Clone, Default)]
pub struct NewCompany {
    pub name: String,
    pub address: String,
    pub country: Option<String>,
    pub employees: Vec<NewEmployee>,
}

/// Full replacement of a company's fields. `employees` are added, existing
/// employees are kept.
#[derive(Debug, Clone, Default)]
pub struct CompanyUpdate {
    pub name: String,
    pub address: String,
    pub country: Option<String>,
    pub employees: Vec<NewEmployee>,
}

#[derive(Debug, Clone, Default)]
pub struct NewEmployee {
    pub name: String,
    pub age: i32,
    pub position: String,
}

/// Full replacement of an employee's fields.
#[derive(Debug, Clone, Default)]
pub struct EmployeeUpdate {
    pub name: String,
    pub age: i32,
    pub position: String,
}

/// Partial update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub position: Option<String>,
}

impl EmployeePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none() && self.position.is_none()
    }

    /// Result of applying this patch to `current`.
    pub fn apply_to(&self, current: &Employee) -> EmployeeUpdate {
        EmployeeUpdate {
            name: self.name.clone().unwrap_or_else(|| current.name.clone()),
            age: self.age.unwrap_or(current.age),
            position: self
                .position
                .clone()
                .unwrap_or_else(|| current.position.clone()),
        }
    }
}

impl From<NewEmployee> for EmployeeUpdate {
    fn from(e: NewEmployee) -> Self {
        Self {
            name: e.name,
            age: e.age,
            position: e.position,
        }
    }
}
