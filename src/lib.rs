/*!
This crate provides a deterministic finite automaton over bytes that can be
built incrementally and then run with a constant amount of work per byte.

The central type is [`FiniteAutomaton`]. It starts out recognizing only the
empty string and is grown in place: bytes, byte sets and byte sequences can
be appended to it, other automata can be concatenated or unioned into it, and
its language can be replaced by its Kleene star. After every one of these
operations the automaton is fully deterministic, with exactly one transition
per state and byte, so running it never backtracks.

Input is fed to an automaton through an [`Accumulator`], a small copyable
cursor that remembers only the current state. Many accumulators can share
one automaton. Any type implementing the [`Automaton`] trait can be driven
by an accumulator, not just `FiniteAutomaton`.

Automata can also be serialized to and deserialized from a simple little
endian binary format via [`FiniteAutomaton::to_bytes`] and
[`FiniteAutomaton::from_bytes`].

# Example: building an automaton

This example builds an automaton for `(abc)*|(abab)*` and runs it.

```
use byte_automata::FiniteAutomaton;

let mut abc = FiniteAutomaton::new();
abc.append_sequence(b"abc");
abc.assign_kleene_star();

let mut abab = FiniteAutomaton::new();
abab.append_sequence(b"abab");
abab.assign_kleene_star();

let fa = &abc | &abab;
assert!(fa.is_match(b""));
assert!(fa.is_match(b"abcabc"));
assert!(fa.is_match(b"abab"));
assert!(!fa.is_match(b"abcabab"));
```

# Example: feeding input incrementally

An accumulator reports both whether the input so far is accepted and
whether no continuation could ever be accepted, which allows stopping early
when reading from a stream.

```
use byte_automata::FiniteAutomaton;

let mut fa = FiniteAutomaton::new();
fa.append_set(b"0123456789");
let digit = fa.clone();
fa += digit.kleene_star();

let mut acc = fa.accumulator();
for &b in b"2024-10-17" {
    acc.transition(b);
    if acc.is_error() {
        break;
    }
}
assert!(acc.is_error());
```

# Crate features

* **logging** - When enabled, the `log` crate is used to emit messages about
  determinization and minimization. This is useful when debugging
  unexpectedly large automata.
*/

#[cfg(not(any(
    target_pointer_width = "32",
    target_pointer_width = "64"
)))]
compile_error!("byte-automata currently not supported on non-{32,64}");

pub use crate::{
    accumulator::Accumulator,
    automaton::Automaton,
    finite::{Config, FiniteAutomaton},
    table::{State, StateTable, ALPHABET_LEN},
    util::{
        bytes::{DeserializeError, SerializeError},
        id::{StateID, StateIDError},
    },
};

#[macro_use]
mod macros;

mod accumulator;
mod automaton;
mod determinize;
mod finite;
mod minimize;
mod nfa;
mod table;
pub mod util;
