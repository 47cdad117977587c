#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Pressed,
    Released,
    NoChange,
}

// compare two touch samples index by index; extra entries on either side are ignored
pub fn detect(previous: &[bool], current: &[bool]) -> Vec<Edge> {
    debug_assert_eq!(previous.len(), current.len(), "touch sample length changed");
    previous
        .iter()
        .zip(current)
        .map(|(&was, &is)| match (was, is) {
            (false, true) => Edge::Pressed,
            (true, false) => Edge::Released,
            _ => Edge::NoChange,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_each_index() {
        let edges = detect(&[false, true, true, false], &[true, false, true, false]);
        assert_eq!(
            edges,
            vec![Edge::Pressed, Edge::Released, Edge::NoChange, Edge::NoChange]
        );
    }

    #[test]
    fn same_sample_has_no_edges() {
        let sample = [true, false, true];
        assert!(detect(&sample, &sample).iter().all(|e| *e == Edge::NoChange));
    }
}
