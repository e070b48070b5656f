use bstr::ByteSlice;
use byte_automata::{Config, FiniteAutomaton, StateID, ALPHABET_LEN};

use crate::util::{all_strings, literal, set};

const STATE_LEN: usize = ALPHABET_LEN * 4 + 1;
const HEADER_LEN: usize = 1 + 4 + 4;

fn sample() -> FiniteAutomaton {
    // (ab|c)*d
    let mut fa = literal(b"ab");
    fa |= literal(b"c");
    fa.assign_kleene_star();
    fa.append(b'd');
    fa
}

#[test]
fn layout() {
    let fa = literal(b"a");
    let bytes = fa.to_bytes();
    assert_eq!(HEADER_LEN + 3 * STATE_LEN, bytes.len());
    assert_eq!(bytes.len(), fa.write_to_len());

    assert_eq!(FiniteAutomaton::max_supported_version(), bytes[0]);
    assert_eq!(1, bytes[0]);
    assert_eq!(&fa.start_state().to_le_bytes(), &bytes[1..5]);
    assert_eq!(&3u32.to_le_bytes(), &bytes[5..9]);

    // The dead state: all zeroes, not accepting.
    let dead = &bytes[HEADER_LEN..HEADER_LEN + STATE_LEN];
    assert!(dead.iter().all(|&b| b == 0));

    // The start state moves to state 2 on 'a' and nowhere else.
    let start = HEADER_LEN + fa.start_state().as_usize() * STATE_LEN;
    let trans = &bytes[start..start + STATE_LEN];
    let a = usize::from(b'a') * 4;
    assert_eq!(&2u32.to_le_bytes(), &trans[a..a + 4]);
    assert_eq!(0, trans[STATE_LEN - 1]);
}

#[test]
fn roundtrip_short_strings() {
    let fa = sample();
    let (got, nread) = FiniteAutomaton::from_bytes(&fa.to_bytes()).unwrap();
    assert_eq!(fa.write_to_len(), nread);
    assert!(got.is_valid());
    for input in all_strings(b"abcd", 4) {
        assert_eq!(
            fa.is_match(&input),
            got.is_match(&input),
            "{:?}",
            input.as_bstr(),
        );
    }
}

#[test]
fn write_to_buffer() {
    let fa = sample();
    let mut buf = vec![0xAA; fa.write_to_len() + 10];
    let nwrite = fa.write_to(&mut buf).unwrap();
    assert_eq!(fa.write_to_len(), nwrite);
    assert_eq!(&fa.to_bytes()[..], &buf[..nwrite]);

    // Trailing bytes are not consumed.
    let (_, nread) = FiniteAutomaton::from_bytes(&buf).unwrap();
    assert_eq!(nwrite, nread);

    let mut small = vec![0; fa.write_to_len() - 1];
    assert!(fa.write_to(&mut small).is_err());
}

#[test]
fn write_unsupported_version() {
    let fa = sample();
    let mut buf = vec![0; fa.write_to_len()];
    let next = FiniteAutomaton::max_supported_version() + 1;
    assert!(fa.write_to_version(next, &mut buf).is_err());
    assert!(fa.write_to_version(0, &mut buf).is_err());
    assert!(fa.write_to_version(1, &mut buf).is_ok());
}

#[test]
fn read_from_replaces() {
    let src = sample();
    let mut dst = set(b"xyz");
    let nread = dst.read_from(&src.to_bytes()).unwrap();
    assert_eq!(src.write_to_len(), nread);
    assert!(dst.is_match(b"abcd"));
    assert!(!dst.is_match(b"x"));
}

#[test]
fn read_from_keeps_config() {
    let config = Config::new().minimize(true);
    let mut dst = FiniteAutomaton::new_with_config(config);
    dst.read_from(&sample().to_bytes()).unwrap();
    assert!(dst.config().get_minimize());
    assert!(dst.is_match(b"abcd"));

    // Later edits still minimize: both accepting states of [ab]|c merge.
    dst.remove_all();
    dst.append_set(b"ab");
    dst |= literal(b"c");
    assert_eq!(3, dst.state_count());

    let (mut plain, _) = FiniteAutomaton::from_bytes(&sample().to_bytes())
        .unwrap();
    plain.remove_all();
    plain.append_set(b"ab");
    plain |= literal(b"c");
    assert_eq!(4, plain.state_count());
}

#[test]
fn from_bytes_uses_default_config() {
    let mut src = FiniteAutomaton::new_with_config(
        Config::new().minimize(true),
    );
    src.append_sequence(b"xyz");
    let (got, _) = FiniteAutomaton::from_bytes(&src.to_bytes()).unwrap();
    assert_eq!(Config::default(), got.config());
    assert!(!got.config().get_minimize());
}

#[test]
fn read_from_revalidates() {
    let src = literal(b"q");
    let mut dst = FiniteAutomaton::new();
    dst.invalidate();
    dst.read_from(&src.to_bytes()).unwrap();
    assert!(dst.is_valid());
    assert!(dst.is_match(b"q"));
}

// Every kind of bad input must fail and leave the target untouched.
#[test]
fn read_from_failure_leaves_target_unmodified() {
    let good = sample().to_bytes();
    let mut bad_inputs: Vec<(&str, Vec<u8>)> = vec![];

    let mut v = good.clone();
    v[0] = FiniteAutomaton::max_supported_version() + 1;
    bad_inputs.push(("future version", v));

    let mut v = good.clone();
    v[0] = 0;
    bad_inputs.push(("version zero", v));

    bad_inputs.push(("empty", vec![]));
    bad_inputs.push(("truncated header", good[..7].to_vec()));
    bad_inputs.push(("truncated table", good[..good.len() - 1].to_vec()));

    let mut v = good.clone();
    v[1..5].copy_from_slice(&1000u32.to_le_bytes());
    bad_inputs.push(("start out of range", v));

    let mut v = good.clone();
    v[5..9].copy_from_slice(&0u32.to_le_bytes());
    bad_inputs.push(("no states", v));

    let mut v = good.clone();
    let at = HEADER_LEN + STATE_LEN + 4 * usize::from(b'a');
    v[at..at + 4].copy_from_slice(&1000u32.to_le_bytes());
    bad_inputs.push(("transition out of range", v));

    let mut v = good.clone();
    v[HEADER_LEN + STATE_LEN - 1] = 2;
    bad_inputs.push(("bad accept flag", v));

    let mut v = good.clone();
    v[HEADER_LEN + STATE_LEN - 1] = 1;
    bad_inputs.push(("accepting dead state", v));

    let mut v = good.clone();
    v[HEADER_LEN..HEADER_LEN + 4].copy_from_slice(&1u32.to_le_bytes());
    bad_inputs.push(("dead state escapes", v));

    let mut v = good.clone();
    let count = (good.len() - HEADER_LEN) / STATE_LEN;
    for i in 0..count {
        v[HEADER_LEN + (i + 1) * STATE_LEN - 1] = 0;
    }
    bad_inputs.push(("no state can match", v));

    let mut v = good.clone();
    v[1..5].copy_from_slice(&u32::MAX.to_le_bytes());
    bad_inputs.push(("start state ID overflow", v));

    for (name, input) in bad_inputs {
        let mut dst = literal(b"keep");
        let before = dst.clone();
        let res = dst.read_from(&input);
        assert!(res.is_err(), "{} should fail", name);
        assert_eq!(before.table(), dst.table(), "{}", name);
        assert_eq!(before.start_state(), dst.start_state(), "{}", name);
        assert!(dst.is_match(b"keep"), "{}", name);
        // Errors should render a message.
        assert!(!res.unwrap_err().to_string().is_empty(), "{}", name);
    }
}

#[test]
fn invalid_serializes_as_empty_language() {
    let mut fa = literal(b"abc");
    fa.invalidate();
    let (got, _) = FiniteAutomaton::from_bytes(&fa.to_bytes()).unwrap();
    assert!(got.is_valid());
    assert_eq!(StateID::DEAD, got.start_state());
    assert!(!got.is_match(b""));
    assert!(!got.is_match(b"abc"));
}
