//! Character-level diff of two strings using Myers' O(ND) algorithm, for
//! showing where an expected rendering of a map differs from the actual one.
//! Only meant for failure reports; nothing on the map's hot path uses it.
//!
//! See "An O(ND) Difference Algorithm and Its Variations", Eugene W. Myers,
//! and https://blog.jcoglan.com/2017/02/12/the-myers-diff-algorithm-part-1/

const DELETED: &str = "\u{1b}[31m";
const INSERTED: &str = "\u{1b}[32m";
const RESET: &str = "\u{1b}[0m";

/// One step of the edit script. Indexes point into the side the character
/// comes from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Edit {
    Equal(usize),
    Delete(usize),
    Insert(usize),
}

/// Diffs `first` against `second`. Returns None when they're the same,
/// otherwise the merged text with characters only in `first` in red and
/// characters only in `second` in green.
pub fn diff(first: &str, second: &str) -> Option<String> {
    if first == second {
        return None;
    }

    let a: Vec<char> = first.chars().collect();
    let b: Vec<char> = second.chars().collect();

    let mut out = String::with_capacity(first.len().max(second.len()));
    for edit in edit_script(&a, &b) {
        match edit {
            Edit::Equal(i) => out.push(a[i]),
            Edit::Delete(i) => {
                out.push_str(DELETED);
                out.push(a[i]);
                out.push_str(RESET);
            }
            Edit::Insert(j) => {
                out.push_str(INSERTED);
                out.push(b[j]);
                out.push_str(RESET);
            }
        }
    }

    Some(out)
}

/// Furthest-reaching x per diagonal, offset so diagonal `-max` sits at 0.
struct Frontier {
    v: Vec<isize>,
    offset: isize,
}

impl Frontier {
    fn new(max: usize) -> Self {
        Self {
            v: vec![0; 2 * max + 2],
            offset: max as isize,
        }
    }

    fn get(&self, k: isize) -> isize {
        self.v[(k + self.offset) as usize]
    }

    fn set(&mut self, k: isize, x: isize) {
        self.v[(k + self.offset) as usize] = x;
    }

    /// Whether the best path onto diagonal `k` at depth `d` comes down from
    /// diagonal `k + 1` (an insertion) rather than across from `k - 1`.
    fn comes_down(&self, k: isize, d: isize) -> bool {
        k == -d || (k != d && self.get(k - 1) < self.get(k + 1))
    }
}

/// Runs the forward search, keeping a snapshot of the frontier from before
/// each depth so the path can be walked back afterwards.
///
/// The trace costs O(D * (N + M)) memory for D edits. That's fine for test
/// diagnostics on small maps; don't point it at large renderings.
fn shortest_edit(a: &[char], b: &[char]) -> Vec<Frontier> {
    let n = a.len() as isize;
    let m = b.len() as isize;
    let max = a.len() + b.len();

    let mut v = Frontier::new(max);
    let mut trace = Vec::new();

    for d in 0..=max as isize {
        trace.push(Frontier {
            v: v.v.clone(),
            offset: v.offset,
        });

        let mut k = -d;
        while k <= d {
            let mut x = if v.comes_down(k, d) {
                v.get(k + 1)
            } else {
                v.get(k - 1) + 1
            };
            let mut y = x - k;

            // follow the snake of matching characters
            while x < n && y < m && a[x as usize] == b[y as usize] {
                x += 1;
                y += 1;
            }

            v.set(k, x);

            if x >= n && y >= m {
                return trace;
            }

            k += 2;
        }
    }

    trace
}

fn edit_script(a: &[char], b: &[char]) -> Vec<Edit> {
    let trace = shortest_edit(a, b);

    let mut x = a.len() as isize;
    let mut y = b.len() as isize;
    let mut edits = Vec::with_capacity(a.len() + b.len());

    for (d, v) in trace.iter().enumerate().rev() {
        let d = d as isize;
        let k = x - y;

        let prev_k = if v.comes_down(k, d) { k + 1 } else { k - 1 };
        let prev_x = v.get(prev_k);
        let prev_y = prev_x - prev_k;

        while x > prev_x && y > prev_y {
            x -= 1;
            y -= 1;
            edits.push(Edit::Equal(x as usize));
        }

        if d > 0 {
            if x == prev_x {
                edits.push(Edit::Insert(prev_y as usize));
            } else {
                edits.push(Edit::Delete(prev_x as usize));
            }
        }

        x = prev_x;
        y = prev_y;
    }

    edits.reverse();
    edits
}

#[cfg(test)]
mod tests {
    use super::{diff, edit_script, Edit};

    #[test]
    fn test_equal_strings() {
        assert_eq!(None, diff("anteater", "anteater"));
        assert_eq!(
            None,
            diff("anteaters\nare\nawesome", "anteaters\nare\nawesome"),
        );
        assert_eq!(None, diff("", ""));
    }

    #[test]
    fn test_classic_example() {
        assert_eq!(
            Some(
                "\u{1b}[31mA\u{1b}[0m\u{1b}[31mB\u{1b}[0mC\u{1b}[32mB\u{1b}[0mAB\u{1b}[31mB\u{1b}[0mA\u{1b}[32mC\u{1b}[0m"
                    .to_owned()
            ),
            diff("ABCABBA", "CBABAC")
        );
    }

    #[test]
    fn test_appended_and_dropped() {
        assert_eq!(
            Some("anteater\u{1b}[32ms\u{1b}[0m".to_owned()),
            diff("anteater", "anteaters")
        );
        assert_eq!(
            Some("anteater\u{1b}[31ms\u{1b}[0m".to_owned()),
            diff("anteaters", "anteater")
        );
    }

    #[test]
    fn test_multi_line() {
        assert_eq!(
            Some(
                "anteaters\nare\n\u{1b}[32ml\u{1b}[0ma\u{1b}[31mw\u{1b}[0m\u{1b}[31me\u{1b}[0m\u{1b}[31ms\u{1b}[0m\u{1b}[31mo\u{1b}[0mme"
                    .to_owned()
            ),
            diff("anteaters\nare\nawesome", "anteaters\nare\nlame")
        );
    }

    #[test]
    fn test_one_side_empty() {
        assert_eq!(
            vec![Edit::Insert(0), Edit::Insert(1)],
            edit_script(&[], &['a', 'b'])
        );
        assert_eq!(
            vec![Edit::Delete(0), Edit::Delete(1)],
            edit_script(&['a', 'b'], &[])
        );
    }

    #[test]
    fn test_multibyte_characters() {
        assert_eq!(
            Some("na\u{1b}[31mï\u{1b}[0m\u{1b}[32mi\u{1b}[0mve".to_owned()),
            diff("naïve", "naive")
        );
    }
}
