//! Archive file names for extracted images.

use std::collections::HashSet;

/// Replace every character outside `[A-Za-z0-9]` with `_`.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Outcome of assigning a file name to one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignedName {
    pub file_name: String,
    /// Set when the natural name was already taken.
    pub wanted: Option<String>,
}

/// Hands out unique image file names in record order.
///
/// The first record keeps `<prefix>_<name>.<ext>`. Later records colliding
/// with a taken name get their id appended, then a counter. Names are
/// compared case-insensitively so extraction on case-insensitive
/// filesystems cannot overwrite files either.
#[derive(Debug, Default)]
pub struct FileNamer {
    taken: HashSet<String>,
}

impl FileNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a file name as taken without assigning it to a record.
    /// Returns false when it was already taken.
    pub fn reserve(&mut self, file_name: &str) -> bool {
        self.try_take(file_name)
    }

    pub fn assign(
        &mut self,
        prefix: &str,
        name: Option<&str>,
        id: Option<&str>,
        ext: &str,
    ) -> AssignedName {
        let stem = format!(
            "{}_{}",
            prefix,
            sanitize_name(name.filter(|n| !n.is_empty()).unwrap_or("unnamed"))
        );
        let natural = format!("{}.{}", stem, ext);
        if self.try_take(&natural) {
            return AssignedName {
                file_name: natural,
                wanted: None,
            };
        }

        let stem = match id {
            Some(id) if !id.is_empty() => {
                let with_id = format!("{}_{}", stem, sanitize_name(id));
                let candidate = format!("{}.{}", with_id, ext);
                if self.try_take(&candidate) {
                    return AssignedName {
                        file_name: candidate,
                        wanted: Some(natural),
                    };
                }
                with_id
            }
            _ => stem,
        };

        let mut counter = 2u32;
        loop {
            let candidate = format!("{}_{}.{}", stem, counter, ext);
            if self.try_take(&candidate) {
                return AssignedName {
                    file_name: candidate,
                    wanted: Some(natural),
                };
            }
            counter += 1;
        }
    }

    fn try_take(&mut self, file_name: &str) -> bool {
        self.taken.insert(file_name.to_ascii_lowercase())
    }
}
