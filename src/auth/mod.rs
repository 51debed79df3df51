//! Sign-in, saved sessions and token exchange through azure_identity

pub mod credentials;
pub mod session;
pub mod signin;
pub mod token;

pub use credentials::ServicePrincipal;
pub use session::{Account, AccountKind, ConnectTarget, FileSessionStore, Session, SessionStore};
pub use signin::{IdentitySignIn, SignIn};
pub use token::{IdentityTokenProvider, TokenProvider};
