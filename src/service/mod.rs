//! PersonService: transactional writes. PersonValidator: request validation.

mod person;
pub mod validation;
pub use person::PersonService;
pub use validation::PersonValidator;
