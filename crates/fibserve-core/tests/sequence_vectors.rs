#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]


use fibserve_core::{generate, SequenceRequest};

#[test]
fn sequence_vectors() {
    let vectors = vector_loader::load("sequence.json");
    assert!(!vectors.is_empty());

    for v in vectors {
        match (v.expect, v.expect_error) {
            (Some(expect), None) => {
                let seq = generate(v.n).unwrap_or_else(|e| panic!("{}: {e}", v.description));
                assert_eq!(seq.len(), expect.len, "{}", v.description);
                if let Some(body) = expect.body {
                    assert_eq!(seq.to_string(), body, "{}", v.description);
                }
                if let Some(last) = expect.last {
                    let got = seq.as_slice().last().expect("non-empty").to_string();
                    assert_eq!(got, last, "{}", v.description);
                }
            }
            (None, Some(expect_error)) => {
                let err = generate(v.n).expect_err(&v.description);
                assert_eq!(err.code().as_str(), expect_error.code, "{}", v.description);
                assert_eq!(err.to_string(), expect_error.message, "{}", v.description);
            }
            _ => panic!("{}: vector needs exactly one of expect/expect_error", v.description),
        }
    }
}

#[test]
fn parsed_and_direct_requests_agree() {
    for n in [0i64, 1, 2, 17, 999, 1000] {
        let parsed = SequenceRequest::parse(&n.to_string()).unwrap();
        assert_eq!(parsed, SequenceRequest::new(n).unwrap());
        assert_eq!(parsed.generate(), generate(n).unwrap());
    }
}
