use std::rc::Rc;

use crate::blob::schema::StructDef;
use crate::blob::{GenError, Result};

/// One default value for a declared field.
#[derive(Debug, Clone)]
pub enum Value {
	/// Boolean scalar.
	Bool(bool),
	/// Unsigned integer scalar.
	Unsigned(u64),
	/// Signed integer scalar.
	Signed(i64),
	/// String scalar.
	Str(Box<str>),
	/// Reference to a nested struct instance; `None` is the absent/null
	/// reference, encoded as offset 0.
	Struct(Option<Rc<StructVal>>),
}

impl Value {
	/// Short label of the value kind, for error messages.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Bool(_) => "bool",
			Self::Unsigned(_) => "unsigned",
			Self::Signed(_) => "signed",
			Self::Str(_) => "str",
			Self::Struct(_) => "struct",
		}
	}
}

/// One struct instance: a definition plus values in declared field order.
///
/// Instances are shared via `Rc`; allocation identity (not value equality)
/// decides whether two references name the same node, so reconvergent
/// substructure is flattened and emitted exactly once.
#[derive(Debug)]
pub struct StructVal {
	/// Definition this instance conforms to.
	pub def: Rc<StructDef>,
	/// Values matching `def.fields` one-to-one.
	pub values: Vec<Value>,
}

impl StructVal {
	/// Build an instance, checking the value count against the definition.
	pub fn new(def: Rc<StructDef>, values: Vec<Value>) -> Result<Rc<Self>> {
		if values.len() != def.fields.len() {
			return Err(GenError::FieldCountMismatch {
				struct_name: def.name.to_string(),
				expected: def.fields.len(),
				got: values.len(),
			});
		}
		Ok(Rc::new(Self { def, values }))
	}
}

/// Identity key for a shared node: the `Rc` allocation address.
pub(crate) fn node_id(node: &Rc<StructVal>) -> usize {
	Rc::as_ptr(node) as usize
}
