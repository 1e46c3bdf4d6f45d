use {
    super::error::GatewayError,
    std::{cmp::Ordering, fmt, str::FromStr},
};

/// Billing platform release, e.g. `6.3.1` or `8.1.0-rc.1`.
///
/// Pre-release and build suffixes are ignored; missing components compare as zero.
#[derive(Debug, Clone)]
pub struct PlatformVersion(Vec<u64>);

impl PlatformVersion {
    pub fn new(parts: &[u64]) -> Self {
        Self(parts.to_vec())
    }

    /// Releases before 7.0.0 still expose the separate SSL system URL.
    pub fn is_legacy(&self) -> bool {
        *self < Self::new(&[7, 0, 0])
    }

    fn component(&self, i: usize) -> u64 {
        self.0.get(i).copied().unwrap_or(0)
    }
}

impl FromStr for PlatformVersion {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let core = s
            .trim()
            .split(['-', '+'])
            .next()
            .unwrap_or_default();

        let parts = core
            .split('.')
            .map(|p| p.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| GatewayError::Validation(format!("invalid platform version: {s:?}")))?;

        Ok(Self(parts))
    }
}

impl PartialEq for PlatformVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PlatformVersion {}

impl PartialOrd for PlatformVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PlatformVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.0.len().max(other.0.len());
        (0..len)
            .map(|i| self.component(i).cmp(&other.component(i)))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl fmt::Display for PlatformVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(u64::to_string).collect();
        write!(f, "{}", parts.join("."))
    }
}
