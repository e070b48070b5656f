use std::collections::BTreeSet;

use byte_automata::FiniteAutomaton;

/// The bytes that generated expressions and test inputs draw from. Keeping
/// this small makes exhaustive checks over short strings feasible.
pub const ALPHABET: &[u8] = b"abc";

/// A tiny regular expression language mirroring the construction methods
/// on `FiniteAutomaton`. It comes with a naive backtracking-free matcher
/// that serves as the reference for what an automaton should accept.
#[derive(Clone, Debug)]
pub enum Expr {
    Empty,
    Byte(u8),
    Set(Vec<u8>),
    Seq(Vec<u8>),
    Concat(Box<Expr>, Box<Expr>),
    Union(Box<Expr>, Box<Expr>),
    Star(Box<Expr>),
}

impl Expr {
    /// Build an automaton for this expression using the given automaton as
    /// a template for every leaf. The template determines configuration.
    pub fn build_with(&self, template: &FiniteAutomaton) -> FiniteAutomaton {
        match *self {
            Expr::Empty => template.clone(),
            Expr::Byte(b) => {
                let mut fa = template.clone();
                fa.append(b);
                fa
            }
            Expr::Set(ref set) => {
                let mut fa = template.clone();
                fa.append_set(set);
                fa
            }
            Expr::Seq(ref seq) => {
                let mut fa = template.clone();
                fa.append_sequence(seq);
                fa
            }
            Expr::Concat(ref a, ref b) => {
                let mut fa = a.build_with(template);
                fa += b.build_with(template);
                fa
            }
            Expr::Union(ref a, ref b) => {
                let mut fa = a.build_with(template);
                fa |= b.build_with(template);
                fa
            }
            Expr::Star(ref a) => {
                let mut fa = a.build_with(template);
                fa.assign_kleene_star();
                fa
            }
        }
    }

    pub fn build(&self) -> FiniteAutomaton {
        self.build_with(&FiniteAutomaton::new())
    }

    /// Returns true if and only if this expression matches all of `input`.
    pub fn is_match(&self, input: &[u8]) -> bool {
        self.ends(input, 0).contains(&input.len())
    }

    /// Returns every position at which a match of this expression starting
    /// at `start` can end.
    fn ends(&self, input: &[u8], start: usize) -> BTreeSet<usize> {
        let mut set = BTreeSet::new();
        match *self {
            Expr::Empty => {
                set.insert(start);
            }
            Expr::Byte(b) => {
                if input.get(start) == Some(&b) {
                    set.insert(start + 1);
                }
            }
            // Appending an empty set leaves the language unchanged.
            Expr::Set(ref bytes) if bytes.is_empty() => {
                set.insert(start);
            }
            Expr::Set(ref bytes) => {
                if input.get(start).map_or(false, |b| bytes.contains(b)) {
                    set.insert(start + 1);
                }
            }
            Expr::Seq(ref seq) => {
                if input[start..].starts_with(seq) {
                    set.insert(start + seq.len());
                }
            }
            Expr::Concat(ref a, ref b) => {
                for mid in a.ends(input, start) {
                    set.extend(b.ends(input, mid));
                }
            }
            Expr::Union(ref a, ref b) => {
                set.extend(a.ends(input, start));
                set.extend(b.ends(input, start));
            }
            Expr::Star(ref a) => {
                set.insert(start);
                let mut stack = vec![start];
                while let Some(pos) = stack.pop() {
                    for end in a.ends(input, pos) {
                        if set.insert(end) {
                            stack.push(end);
                        }
                    }
                }
            }
        }
        set
    }

    fn arbitrary_depth(g: &mut quickcheck::Gen, depth: usize) -> Expr {
        let leaf_kinds: &[u8] = &[0, 1, 2, 3];
        let all_kinds: &[u8] = &[0, 1, 2, 3, 4, 5, 6];
        let kinds = if depth == 0 { leaf_kinds } else { all_kinds };
        match *g.choose(kinds).unwrap() {
            0 => Expr::Empty,
            1 => Expr::Byte(arbitrary_byte(g)),
            2 => Expr::Set(arbitrary_bytes(g, 0, 3)),
            3 => Expr::Seq(arbitrary_bytes(g, 0, 3)),
            4 => Expr::Concat(
                Box::new(Expr::arbitrary_depth(g, depth - 1)),
                Box::new(Expr::arbitrary_depth(g, depth - 1)),
            ),
            5 => Expr::Union(
                Box::new(Expr::arbitrary_depth(g, depth - 1)),
                Box::new(Expr::arbitrary_depth(g, depth - 1)),
            ),
            _ => Expr::Star(Box::new(Expr::arbitrary_depth(g, depth - 1))),
        }
    }
}

impl quickcheck::Arbitrary for Expr {
    fn arbitrary(g: &mut quickcheck::Gen) -> Expr {
        Expr::arbitrary_depth(g, 4)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Expr>> {
        match *self {
            Expr::Concat(ref a, ref b) | Expr::Union(ref a, ref b) => {
                Box::new(vec![(**a).clone(), (**b).clone()].into_iter())
            }
            Expr::Star(ref a) => Box::new(std::iter::once((**a).clone())),
            _ => quickcheck::empty_shrinker(),
        }
    }
}

fn arbitrary_byte(g: &mut quickcheck::Gen) -> u8 {
    *g.choose(ALPHABET).unwrap()
}

fn arbitrary_bytes(
    g: &mut quickcheck::Gen,
    min: usize,
    max: usize,
) -> Vec<u8> {
    let lens: Vec<usize> = (min..=max).collect();
    let len = *g.choose(&lens).unwrap();
    (0..len).map(|_| arbitrary_byte(g)).collect()
}

/// Returns every string over `alphabet` whose length is at most `max_len`,
/// shortest first.
pub fn all_strings(alphabet: &[u8], max_len: usize) -> Vec<Vec<u8>> {
    let mut all = vec![vec![]];
    let mut prev = vec![vec![]];
    for _ in 0..max_len {
        let mut next = vec![];
        for s in &prev {
            for &b in alphabet {
                let mut t: Vec<u8> = s.clone();
                t.push(b);
                next.push(t);
            }
        }
        all.extend(next.iter().cloned());
        prev = next;
    }
    all
}

/// Build an automaton that matches exactly the given sequence.
pub fn literal(bytes: &[u8]) -> FiniteAutomaton {
    let mut fa = FiniteAutomaton::new();
    fa.append_sequence(bytes);
    fa
}

/// Build an automaton that matches any single byte from the given set.
pub fn set(bytes: &[u8]) -> FiniteAutomaton {
    let mut fa = FiniteAutomaton::new();
    fa.append_set(bytes);
    fa
}

/// Build an automaton that matches any single byte.
pub fn any_byte() -> FiniteAutomaton {
    let all: Vec<u8> = (0..=255).collect();
    set(&all)
}
