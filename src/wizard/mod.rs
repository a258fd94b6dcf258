//! The four-step inspection wizard.
//!
//! [`Wizard`] holds the state of one form and enforces navigation: moving
//! forward requires the current step's required fields, moving back never
//! does, and a view-mode wizard refuses every mutation. [`WizardRunner`]
//! puts a [`UserInterface`](crate::ui::UserInterface) in front of it.
//!
//! # Example
//!
//! ```
//! use fims::forms::FormCatalog;
//! use fims::wizard::{Wizard, WizardStep};
//!
//! let catalog = FormCatalog::builtin().unwrap();
//! let mut wizard = Wizard::create(catalog.get("office").unwrap().clone());
//! assert!(wizard.next().is_err());
//!
//! wizard.set_input("location_name", "Haveli Taluka Office").unwrap();
//! wizard.set_input("department_name", "Revenue").unwrap();
//! wizard.set_input("employee_name", "S. Jadhav").unwrap();
//! assert_eq!(wizard.next().unwrap(), WizardStep::Location);
//! ```

pub mod flow;
pub mod mode;
pub mod runner;
pub mod step;

pub use flow::{FinishAction, LocationState, Wizard};
pub use mode::FormMode;
pub use runner::{describe_fix, WizardOutcome, WizardRunner};
pub use step::WizardStep;
