/*!
Utilities shared by the automaton construction and serialization code.
*/

pub mod bytes;
pub mod id;

pub(crate) mod escape;
pub(crate) mod sparse_set;
