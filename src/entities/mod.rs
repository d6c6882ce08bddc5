// Entity Models
// District, Student and College are resolved by natural key; Application is
// the join entity that owns the archive lifecycle.
//
// Every entity exposes the same store primitives over a rusqlite connection
// (or an open transaction, which derefs to one):
// - find_*        → Option<Entity>
// - create        → Entity
// - get_or_create → (Entity, created)

pub mod application;
pub mod college;
pub mod district;
pub mod student;

pub use application::{ActiveApplication, Application, ApplicationFields};
pub use college::College;
pub use district::District;
pub use student::Student;
