use crate::lines::Line;

/// Decides whether a set of lines makes a magic square.
pub trait SquareValidator {
    const NAME: &'static str;

    fn verify(&self, lines: &[Line]) -> bool;
}

/// Accepts exactly when every line has the same sum as the first one. An empty set of lines is
/// never magic.
#[derive(Debug, Clone, Copy, Default)]
pub struct SumVerifier;

fn line_sum(line: &[i32]) -> i64 {
    line.iter().map(|v| *v as i64).sum()
}

impl SquareValidator for SumVerifier {
    const NAME: &'static str = "SumVerifier";

    fn verify(&self, lines: &[Line]) -> bool {
        let Some((first, rest)) = lines.split_first() else {
            return false;
        };
        let expected = line_sum(first);
        rest.iter().all(|line| line_sum(line) == expected)
    }
}

#[test]
fn test_sum_verifier() {
    let v = SumVerifier;

    assert!(!v.verify(&[]));
    assert!(v.verify(&[vec![1, 2, 3]]));
    assert!(v.verify(&[vec![1, 2, 3], vec![6], vec![0, 0, 6, 0]]));
    assert!(!v.verify(&[vec![1, 2, 3], vec![6], vec![5]]));
    // Only the first line sets the target
    assert!(!v.verify(&[vec![5], vec![6], vec![6]]));
    assert!(v.verify(&[vec![i32::MAX, i32::MAX], vec![i32::MAX, i32::MAX]]));
}
