//! The applicant contact form shown inside the modal.

mod modal_form;
pub mod validation;

pub use modal_form::ModalForm;
pub use validation::Application;
