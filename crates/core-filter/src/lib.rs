//! Parameter normalization for raw log messages.
//!
//! Each filter is a pure `&str -> String` transformation replacing one kind
//! of variable fragment (addresses, numbers, dates, sizes, IDs) with the
//! parameter token `$v`. A [`FilterArray`] owns a stack of filters and
//! applies them in LIFO order: the filter added last runs first. The
//! clustering and templating layers treat the whole array as opaque
//! pre-processing.

mod common;
mod ipv6;
mod number;
mod regex_filter;

pub use common::*;
pub use ipv6::Ipv6AddressFilter;
pub use number::NumberConstantFilter;
pub use regex_filter::RegexFilter;

/// A single line transformation. `apply_extract` additionally collects the
/// fragments that were replaced; the default implementation extracts
/// nothing.
pub trait LineFilter: Send + Sync {
    fn apply(&self, line: &str) -> String;

    fn apply_extract(&self, line: &str, extracted: &mut Vec<String>) -> String {
        let _ = extracted;
        self.apply(line)
    }
}

/// A heterogeneous filter stack. Filters are applied most-recently-added
/// first.
#[derive(Default)]
pub struct FilterArray {
    filters: Vec<Box<dyn LineFilter>>,
}

impl FilterArray {
    pub fn new() -> Self {
        FilterArray::default()
    }

    /// The full normalization stack used by the shipped tools. The number
    /// constant filter is added first and therefore runs last, after every
    /// structured fragment (dates, addresses, sizes, IDs) has already been
    /// collapsed.
    pub fn standard() -> Self {
        let mut array = FilterArray::new();
        array.add(number_constant_filter());
        array.add(pointed_bracket_filter());
        array.add(square_bracket_filter());
        array.add(hexadec_constant_filter());
        array.add(ipv4_address_filter());
        array.add(mac_address_filter());
        array.add(linux_netif_filter());
        array.add(time_duration_filter());
        array.add(data_size_filter());
        array.add(linux_mem_size_filter());
        array.add(linux_kernel_audit_filter());
        array.add(Ipv6AddressFilter::new());
        array.add(libvirtd_filter());
        array.add(uuid_filter());
        array.add(time_filter());
        array.add(date_filter());
        array.add(long_date_filter());
        array.add(extended_date_filter());
        array
    }

    pub fn add<F: LineFilter + 'static>(&mut self, filter: F) {
        self.filters.push(Box::new(filter));
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl LineFilter for FilterArray {
    fn apply(&self, line: &str) -> String {
        self.filters
            .iter()
            .rev()
            .fold(line.to_string(), |line, filter| filter.apply(&line))
    }

    fn apply_extract(&self, line: &str, extracted: &mut Vec<String>) -> String {
        self.filters
            .iter()
            .rev()
            .fold(line.to_string(), |line, filter| {
                filter.apply_extract(&line, extracted)
            })
    }
}
