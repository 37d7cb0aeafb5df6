use std::collections::{HashSet, VecDeque};
use std::rc::Rc;

use crate::blob::value::{StructVal, Value, node_id};
use crate::blob::{GenError, Result};

/// Order the value tree so every struct precedes all structs that reference
/// it, with the root last.
///
/// Breadth-first traversal from the root records every visit, re-visiting a
/// shared node each time a field reaches it. Reversing the record and keeping
/// each identity's first (reversed-order) occurrence pins a shared node to
/// its deepest visit, which in the reversed sequence lands before every
/// referencing struct. Scalars never enter the sequence.
pub fn flatten_tree(root: &Rc<StructVal>) -> Result<Vec<Rc<StructVal>>> {
	let mut visits: Vec<Rc<StructVal>> = Vec::new();
	let mut queue: VecDeque<Rc<StructVal>> = VecDeque::new();
	queue.push_back(Rc::clone(root));

	while let Some(node) = queue.pop_front() {
		if node.values.len() != node.def.fields.len() {
			return Err(GenError::FieldCountMismatch {
				struct_name: node.def.name.to_string(),
				expected: node.def.fields.len(),
				got: node.values.len(),
			});
		}
		for value in &node.values {
			if let Value::Struct(Some(child)) = value {
				queue.push_back(Rc::clone(child));
			}
		}
		visits.push(node);
	}

	visits.reverse();
	let mut seen: HashSet<usize> = HashSet::new();
	visits.retain(|node| seen.insert(node_id(node)));
	Ok(visits)
}
