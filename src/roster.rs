//! Roster access.
//!
//! The roster is owned by the hiring side of the business. The engine sees
//! it only through [`RosterRepository`], and writes back nothing but
//! performance records and skill maps.

use crate::error::{EngineError, EngineResult};
use crate::models::Employee;

/// Queryable employee roster.
pub trait RosterRepository: Send + Sync {
    /// Every employee in a stable order.
    fn employees(&self) -> &[Employee];

    /// Mutable access to one employee.
    fn find_mut(&mut self, employee_id: &str) -> Option<&mut Employee>;

    /// Adds an employee, replacing any existing record with the same id.
    ///
    /// Called by the hiring side; the engine itself never adds employees.
    fn upsert(&mut self, employee: Employee);

    /// Looks up one employee.
    fn find(&self, employee_id: &str) -> Option<&Employee> {
        self.employees().iter().find(|e| e.id == employee_id)
    }

    /// Looks up one employee or reports it missing.
    fn get(&self, employee_id: &str) -> EngineResult<&Employee> {
        self.find(employee_id)
            .ok_or_else(|| EngineError::EmployeeNotFound {
                employee_id: employee_id.to_string(),
            })
    }
}

/// A roster held in memory, ordered by insertion.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRoster {
    employees: Vec<Employee>,
}

impl InMemoryRoster {
    /// Creates a roster from a list of employees.
    pub fn new(employees: Vec<Employee>) -> Self {
        Self { employees }
    }
}

impl RosterRepository for InMemoryRoster {
    fn employees(&self) -> &[Employee] {
        &self.employees
    }

    fn find_mut(&mut self, employee_id: &str) -> Option<&mut Employee> {
        self.employees.iter_mut().find(|e| e.id == employee_id)
    }

    fn upsert(&mut self, employee: Employee) {
        match self.employees.iter().position(|e| e.id == employee.id) {
            Some(index) => self.employees[index] = employee,
            None => self.employees.push(employee),
        }
    }
}
