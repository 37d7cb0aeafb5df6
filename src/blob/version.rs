use crate::blob::{GenError, Result};

/// Pack a dotted version string into an ordered 32-bit integer.
///
/// Up to four decimal components, each in `[1, 254]`; missing trailing
/// components pad with zero. `"2.1.3"` packs as
/// `(2 << 24) | (1 << 16) | (3 << 8)`, so unsigned comparison of packed
/// values matches component-wise comparison of the version strings.
pub fn pack_version(version: &str) -> Result<u32> {
	let components: Vec<&str> = version.split('.').collect();
	if components.len() > 4 {
		return Err(GenError::VersionTooManyComponents {
			version: version.to_owned(),
			count: components.len(),
		});
	}

	let mut packed = 0_u32;
	for (slot, component) in components.iter().enumerate() {
		let value: u32 = component.parse().map_err(|_| GenError::VersionComponentInvalid {
			version: version.to_owned(),
			component: (*component).to_owned(),
		})?;
		if !(1..=254).contains(&value) {
			return Err(GenError::VersionComponentOutOfRange {
				version: version.to_owned(),
				component: value,
			});
		}
		packed |= value << (24 - 8 * slot as u32);
	}
	Ok(packed)
}
