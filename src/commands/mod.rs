pub mod add;
pub mod backout;
pub mod branch;
pub mod commit;
pub mod pull;
pub mod push;
pub mod revert;
pub mod status;
pub mod update;

pub use add::*;
pub use backout::*;
pub use branch::*;
pub use commit::*;
pub use pull::*;
pub use push::*;
pub use revert::*;
pub use status::*;
pub use update::*;
