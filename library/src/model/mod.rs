//! Graph-side data: nodes, their param descriptors, literal values and tensors.

pub mod node;
pub mod param;
pub mod tensor;
pub mod value;

pub use node::Node;
pub use param::{ParamDescriptor, ParamType};
pub use tensor::{DataType, Tensor, TensorData};
pub use value::AttrValue;
