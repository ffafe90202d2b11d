//! Department hierarchy: forest construction, ancestor chains and views.

pub mod tree;
pub mod views;

pub use tree::{DepartmentForest, TreeNode};
pub use views::{flat_view, nested_view, FlatDepartment, NestedDepartment};
