//! Utility functions for the orders index repository.

use crate::errors::SearchIndexError;

/// Parse and validate a positional record address.
///
/// Addresses have the form `"{order_id}-{record_index}"`, e.g. `"42-0"`.
/// The order id and record index are both base-10 integers; the record
/// index is the zero-based position within the records produced for the
/// order in one projection pass.
///
/// # Returns
///
/// * `Ok((u64, u32))` - Parsed order id and record index
/// * `Err(SearchIndexError)` - If the address is malformed
///
/// # Example
///
/// ```
/// use orders_index_repository::parse_record_address;
///
/// let (order_id, record_index) = parse_record_address("42-3").expect("valid address");
/// assert_eq!(order_id, 42);
/// assert_eq!(record_index, 3);
/// ```
pub fn parse_record_address(address: &str) -> Result<(u64, u32), SearchIndexError> {
    let (order_part, index_part) = address.rsplit_once('-').ok_or_else(|| {
        SearchIndexError::validation(format!(
            "Invalid record address '{}': expected '{{order_id}}-{{record_index}}'",
            address
        ))
    })?;

    let order_id = order_part.parse::<u64>().map_err(|e| {
        SearchIndexError::validation(format!(
            "Invalid order id in record address '{}': {}",
            address, e
        ))
    })?;
    let record_index = index_part.parse::<u32>().map_err(|e| {
        SearchIndexError::validation(format!(
            "Invalid record index in record address '{}': {}",
            address, e
        ))
    })?;

    Ok((order_id, record_index))
}
