pub mod backend;
pub mod browser;
pub mod config;
pub mod console;
pub mod editor;
pub mod error;
pub mod form;
pub mod panel;
pub mod primary_key;
pub mod schema;
pub mod server;
pub mod state;
pub mod statement;
pub mod store;
pub mod value;
pub mod view;

// Re-export them for easier access from the binaries
pub use backend::*;
pub use config::*;
pub use console::*;
pub use error::*;
pub use form::*;
pub use panel::*;
pub use primary_key::*;
pub use schema::*;
pub use server::*;
pub use state::*;
pub use statement::*;
pub use store::*;
pub use value::*;
pub use view::*;
