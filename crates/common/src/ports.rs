//! Port set parsing and iteration
//!
//! A [`PortSet`] is the normalized form of a user port specification like
//! `"22,80-90,443"`: sorted, deduplicated, and never empty. Construction is
//! the only place port specs are validated; everything downstream can trust
//! the invariants.

use crate::error::DragnetError;
use std::fmt;
use std::str::FromStr;

/// Highest valid TCP port.
pub const MAX_PORT: u16 = 65535;

/// Non-empty, sorted, deduplicated set of ports to probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSet(Vec<u16>);

impl PortSet {
    /// Builds a set from explicit ports, sorting and deduplicating.
    ///
    /// Rejects an empty list and port 0.
    pub fn from_ports(ports: Vec<u16>) -> Result<Self, DragnetError> {
        if ports.is_empty() {
            return Err(DragnetError::InvalidPortSpec("no ports specified".into()));
        }
        if ports.contains(&0) {
            return Err(DragnetError::InvalidPortSpec(
                "port 0 is not scannable".into(),
            ));
        }
        let mut ports = ports;
        ports.sort_unstable();
        ports.dedup();
        Ok(Self(ports))
    }

    /// Inclusive range `start..=end`.
    pub fn range(start: u16, end: u16) -> Result<Self, DragnetError> {
        if start == 0 {
            return Err(DragnetError::InvalidPortSpec(
                "port 0 is not scannable".into(),
            ));
        }
        if start > end {
            return Err(DragnetError::InvalidPortSpec(format!(
                "invalid range: {start} > {end}"
            )));
        }
        Ok(Self((start..=end).collect()))
    }

    /// Every scannable port, 1 through 65535.
    #[must_use]
    pub fn all() -> Self {
        Self((1..=MAX_PORT).collect())
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// A constructed set is never empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, port: u16) -> bool {
        self.0.binary_search(&port).is_ok()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.0.iter().copied()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u16] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a PortSet {
    type Item = u16;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, u16>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

/// Parses one port token, giving 0 and out-of-range values distinct errors
/// from plain garbage.
fn parse_port(token: &str) -> Result<u16, DragnetError> {
    let value: u32 = token
        .parse()
        .map_err(|_| DragnetError::InvalidPortSpec(format!("invalid port: {token:?}")))?;
    if value == 0 {
        return Err(DragnetError::InvalidPortSpec(
            "port 0 is not scannable".into(),
        ));
    }
    if value > u32::from(MAX_PORT) {
        return Err(DragnetError::InvalidPortSpec(format!(
            "port {value} exceeds {MAX_PORT}"
        )));
    }
    Ok(value as u16)
}

impl FromStr for PortSet {
    type Err = DragnetError;

    /// Parses a spec like `"80,443,1000-1010"` into a port set.
    ///
    /// Tokens are comma-separated; each is either a single port or an
    /// inclusive `start-end` range. Whitespace around tokens is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut ports = Vec::new();

        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            if let Some((start, end)) = part.split_once('-') {
                let start = parse_port(start.trim())?;
                let end = parse_port(end.trim())?;
                if start > end {
                    return Err(DragnetError::InvalidPortSpec(format!(
                        "invalid range: {start} > {end}"
                    )));
                }
                ports.extend(start..=end);
            } else {
                ports.push(parse_port(part)?);
            }
        }

        Self::from_ports(ports)
    }
}

impl fmt::Display for PortSet {
    /// Renders the set back in spec form, compressing consecutive runs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        let mut i = 0;
        while i < self.0.len() {
            let start = self.0[i];
            let mut end = start;
            while i + 1 < self.0.len() && self.0[i + 1] == end + 1 {
                end = self.0[i + 1];
                i += 1;
            }
            if !first {
                f.write_str(",")?;
            }
            if start == end {
                write!(f, "{start}")?;
            } else {
                write!(f, "{start}-{end}")?;
            }
            first = false;
            i += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single() {
        let ports: PortSet = "80".parse().unwrap();
        assert_eq!(ports.as_slice(), &[80]);
    }

    #[test]
    fn parse_multiple() {
        let ports: PortSet = "22,80,443".parse().unwrap();
        assert_eq!(ports.as_slice(), &[22, 80, 443]);
    }

    #[test]
    fn parse_range() {
        let ports: PortSet = "1-3".parse().unwrap();
        assert_eq!(ports.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn parse_mixed() {
        let ports: PortSet = "22,80-82,443".parse().unwrap();
        assert_eq!(ports.as_slice(), &[22, 80, 81, 82, 443]);
    }

    #[test]
    fn parse_whitespace() {
        let ports: PortSet = " 80 , 443 ".parse().unwrap();
        assert_eq!(ports.as_slice(), &[80, 443]);
    }

    #[test]
    fn parse_empty_rejected() {
        assert!("".parse::<PortSet>().is_err());
        assert!("   ".parse::<PortSet>().is_err());
        assert!(",,,".parse::<PortSet>().is_err());
    }

    #[test]
    fn parse_port_zero_rejected() {
        assert!("0".parse::<PortSet>().is_err());
        assert!("0-80".parse::<PortSet>().is_err());
        assert!(PortSet::from_ports(vec![0, 80]).is_err());
        assert!(PortSet::range(0, 10).is_err());
    }

    #[test]
    fn parse_out_of_range_rejected() {
        assert!("65536".parse::<PortSet>().is_err());
        assert!("80-70000".parse::<PortSet>().is_err());
    }

    #[test]
    fn parse_reversed_range_rejected() {
        assert!("90-80".parse::<PortSet>().is_err());
        assert!(PortSet::range(90, 80).is_err());
    }

    #[test]
    fn parse_garbage_rejected() {
        assert!("http".parse::<PortSet>().is_err());
        assert!("80-".parse::<PortSet>().is_err());
        assert!("-80".parse::<PortSet>().is_err());
        assert!("1-2-3".parse::<PortSet>().is_err());
    }

    #[test]
    fn duplicates_and_order_normalized() {
        let ports: PortSet = "443,80,443,22,80-81".parse().unwrap();
        assert_eq!(ports.as_slice(), &[22, 80, 81, 443]);
    }

    #[test]
    fn contains_uses_sorted_order() {
        let ports: PortSet = "22,80-82,443".parse().unwrap();
        assert!(ports.contains(81));
        assert!(!ports.contains(8080));
    }

    #[test]
    fn display_compresses_runs() {
        let ports: PortSet = "22,80,81,82,443".parse().unwrap();
        assert_eq!(ports.to_string(), "22,80-82,443");

        let single: PortSet = "8080".parse().unwrap();
        assert_eq!(single.to_string(), "8080");
    }

    #[test]
    fn all_spans_the_full_space() {
        let ports = PortSet::all();
        assert_eq!(ports.len(), 65535);
        assert_eq!(ports.as_slice()[0], 1);
        assert_eq!(*ports.as_slice().last().unwrap(), MAX_PORT);
    }
}
