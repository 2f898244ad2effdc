mod invoker;
mod orchestrator;
mod roles;
mod transcript;

pub use invoker::{compose_prompt, Invocation, ModelInvoker};
pub use orchestrator::{round_one_category, SessionOrchestrator, SessionReport, SessionState};
pub use roles::{RoleId, RoleProfile, RoleRegistry, RosterEntry};
pub use transcript::{Category, TeamMessage, Transcript};
