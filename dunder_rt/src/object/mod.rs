pub mod class;
pub mod func;
pub mod instance;
pub mod iter;
pub mod slice;
pub mod value;

pub use self::{class::*, func::*, instance::*, iter::*, slice::*, value::*};
