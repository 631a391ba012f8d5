//! Tenant-scoped employee and customer CRUD
//!
//! Every operation derives its dealer scope from the session. Creates
//! stamp the caller's tenant server-side; updates refuse records owned by
//! another dealer; terminations are one-way. Identity numbers (employee
//! aadhar, customer official id) are unique across the entire store, and
//! the UNIQUE index makes the check-and-insert atomic — the loser of a
//! racing pair surfaces here as `DuplicateIdentity`.

use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{CustomerRepository, EmployeeRepository},
    middleware::Session,
    models::{
        CreateCustomerRequest, CreateEmployeeRequest, Customer, CustomerStatus, Employee,
        EmployeeStatus, TerminationRequest, UpdateCustomerRequest, UpdateEmployeeRequest,
    },
    utils::{validation, AppError},
};

pub struct RegistryService {
    pool: SqlitePool,
}

impl RegistryService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // Employees

    pub async fn list_employees(&self, session: &Session) -> Result<Vec<Employee>, AppError> {
        let dealer_id = session.require_tenant()?;
        Ok(EmployeeRepository::new(&self.pool)
            .list_by_dealer(dealer_id)
            .await?)
    }

    pub async fn create_employee(
        &self,
        session: &Session,
        req: &CreateEmployeeRequest,
    ) -> Result<Employee, AppError> {
        let dealer_id = session.require_tenant()?;
        req.validate()?;
        if !validation::validate_identity_number(&req.aadhar) {
            return Err(AppError::ValidationError(
                "Aadhar number is required".to_string(),
            ));
        }
        if !validation::validate_phone(&req.phone) {
            return Err(AppError::ValidationError(
                "Phone must contain at least 6 digits".to_string(),
            ));
        }

        let employee = Employee {
            id: Uuid::new_v4(),
            dealer_id,
            first_name: req.first_name.trim().to_string(),
            last_name: req.last_name.trim().to_string(),
            phone: req.phone.trim().to_string(),
            email: req.email.trim().to_string(),
            aadhar: req.aadhar.trim().to_string(),
            position: req.position.trim().to_string(),
            hire_date: req.hire_date,
            status: EmployeeStatus::Active,
            termination_date: None,
            termination_reason: None,
        };

        EmployeeRepository::new(&self.pool)
            .insert(&employee)
            .await
            .map_err(|e| {
                AppError::from_repo(
                    e,
                    AppError::DuplicateIdentity(format!(
                        "An employee with Aadhar number {} already exists",
                        employee.aadhar
                    )),
                )
            })?;

        Ok(employee)
    }

    pub async fn update_employee(
        &self,
        session: &Session,
        employee_id: Uuid,
        req: &UpdateEmployeeRequest,
    ) -> Result<Employee, AppError> {
        let dealer_id = session.require_tenant()?;
        let repo = EmployeeRepository::new(&self.pool);
        let mut employee = repo
            .get_by_id(employee_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

        if employee.dealer_id != dealer_id {
            return Err(AppError::Forbidden(
                "Employee belongs to another dealer".to_string(),
            ));
        }

        if let Some(ref v) = req.first_name {
            employee.first_name = v.trim().to_string();
        }
        if let Some(ref v) = req.last_name {
            employee.last_name = v.trim().to_string();
        }
        if let Some(ref v) = req.phone {
            if !validation::validate_phone(v) {
                return Err(AppError::ValidationError(
                    "Phone must contain at least 6 digits".to_string(),
                ));
            }
            employee.phone = v.trim().to_string();
        }
        if let Some(ref v) = req.email {
            employee.email = v.trim().to_string();
        }
        if let Some(ref v) = req.aadhar {
            if !validation::validate_identity_number(v) {
                return Err(AppError::ValidationError(
                    "Aadhar number is required".to_string(),
                ));
            }
            employee.aadhar = v.trim().to_string();
        }
        if let Some(ref v) = req.position {
            employee.position = v.trim().to_string();
        }
        if let Some(v) = req.hire_date {
            employee.hire_date = v;
        }

        repo.update(&employee).await.map_err(|e| {
            AppError::from_repo(
                e,
                AppError::DuplicateIdentity(format!(
                    "An employee with Aadhar number {} already exists",
                    employee.aadhar
                )),
            )
        })?;

        Ok(employee)
    }

    /// One-way transition to terminated. The reason and date become
    /// visible to every dealer through the search index; that shared
    /// visibility is the point of recording them.
    pub async fn terminate_employee(
        &self,
        session: &Session,
        employee_id: Uuid,
        req: &TerminationRequest,
    ) -> Result<Employee, AppError> {
        let dealer_id = session.require_tenant()?;
        if !validation::validate_reason(&req.reason) {
            return Err(AppError::ValidationError(
                "Termination reason is required".to_string(),
            ));
        }

        let repo = EmployeeRepository::new(&self.pool);
        let mut employee = repo
            .get_by_id(employee_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

        if employee.dealer_id != dealer_id {
            return Err(AppError::Forbidden(
                "Employee belongs to another dealer".to_string(),
            ));
        }

        employee
            .terminate(req.reason.trim().to_string(), req.date)
            .map_err(|_| {
                AppError::ValidationError("Employee is already terminated".to_string())
            })?;
        repo.update(&employee).await?;

        Ok(employee)
    }

    // Customers

    pub async fn list_customers(&self, session: &Session) -> Result<Vec<Customer>, AppError> {
        let dealer_id = session.require_tenant()?;
        Ok(CustomerRepository::new(&self.pool)
            .list_by_dealer(dealer_id)
            .await?)
    }

    pub async fn create_customer(
        &self,
        session: &Session,
        req: &CreateCustomerRequest,
    ) -> Result<Customer, AppError> {
        let dealer_id = session.require_tenant()?;
        req.validate()?;
        if !validation::validate_identity_number(&req.official_id) {
            return Err(AppError::ValidationError(
                "Official id is required".to_string(),
            ));
        }
        if !validation::validate_phone(&req.phone) {
            return Err(AppError::ValidationError(
                "Phone must contain at least 6 digits".to_string(),
            ));
        }

        let customer = Customer {
            id: Uuid::new_v4(),
            dealer_id,
            customer_type: req.customer_type,
            name_or_entity: req.name_or_entity.trim().to_string(),
            contact_person: req
                .contact_person
                .as_deref()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            phone: req.phone.trim().to_string(),
            email: req.email.trim().to_string(),
            official_id: req.official_id.trim().to_string(),
            address: req.address.trim().to_string(),
            status: CustomerStatus::Active,
            termination_date: None,
            termination_reason: None,
        };

        CustomerRepository::new(&self.pool)
            .insert(&customer)
            .await
            .map_err(|e| {
                AppError::from_repo(
                    e,
                    AppError::DuplicateIdentity(format!(
                        "A customer with official ID {} already exists",
                        customer.official_id
                    )),
                )
            })?;

        Ok(customer)
    }

    pub async fn update_customer(
        &self,
        session: &Session,
        customer_id: Uuid,
        req: &UpdateCustomerRequest,
    ) -> Result<Customer, AppError> {
        let dealer_id = session.require_tenant()?;
        let repo = CustomerRepository::new(&self.pool);
        let mut customer = repo
            .get_by_id(customer_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))?;

        if customer.dealer_id != dealer_id {
            return Err(AppError::Forbidden(
                "Customer belongs to another dealer".to_string(),
            ));
        }

        if let Some(v) = req.customer_type {
            customer.customer_type = v;
        }
        if let Some(ref v) = req.name_or_entity {
            customer.name_or_entity = v.trim().to_string();
        }
        if let Some(ref v) = req.contact_person {
            let trimmed = v.trim().to_string();
            customer.contact_person = (!trimmed.is_empty()).then_some(trimmed);
        }
        if let Some(ref v) = req.phone {
            if !validation::validate_phone(v) {
                return Err(AppError::ValidationError(
                    "Phone must contain at least 6 digits".to_string(),
                ));
            }
            customer.phone = v.trim().to_string();
        }
        if let Some(ref v) = req.email {
            customer.email = v.trim().to_string();
        }
        if let Some(ref v) = req.official_id {
            if !validation::validate_identity_number(v) {
                return Err(AppError::ValidationError(
                    "Official id is required".to_string(),
                ));
            }
            customer.official_id = v.trim().to_string();
        }
        if let Some(ref v) = req.address {
            customer.address = v.trim().to_string();
        }

        repo.update(&customer).await.map_err(|e| {
            AppError::from_repo(
                e,
                AppError::DuplicateIdentity(format!(
                    "A customer with official ID {} already exists",
                    customer.official_id
                )),
            )
        })?;

        Ok(customer)
    }

    /// One-way transition to inactive, the customer analog of employee
    /// termination.
    pub async fn terminate_customer(
        &self,
        session: &Session,
        customer_id: Uuid,
        req: &TerminationRequest,
    ) -> Result<Customer, AppError> {
        let dealer_id = session.require_tenant()?;
        if !validation::validate_reason(&req.reason) {
            return Err(AppError::ValidationError(
                "Termination reason is required".to_string(),
            ));
        }

        let repo = CustomerRepository::new(&self.pool);
        let mut customer = repo
            .get_by_id(customer_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))?;

        if customer.dealer_id != dealer_id {
            return Err(AppError::Forbidden(
                "Customer belongs to another dealer".to_string(),
            ));
        }

        customer
            .terminate(req.reason.trim().to_string(), req.date)
            .map_err(|_| {
                AppError::ValidationError("Customer is already inactive".to_string())
            })?;
        repo.update(&customer).await?;

        Ok(customer)
    }
}
