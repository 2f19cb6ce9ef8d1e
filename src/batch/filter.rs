use log::debug;

use super::PaymentItem;

/// Items split by whether their payee can be paid by direct entry
#[derive(Debug, Default)]
pub struct Partition<'a> {
    pub bankable: Vec<&'a PaymentItem>,
    pub excluded: Vec<&'a PaymentItem>,
}

/// Items whose payee has a complete bank profile, in original order
pub fn bankable_items(items: &[PaymentItem]) -> Vec<&PaymentItem> {
    partition(items).bankable
}

/// Split items into bankable and excluded, preserving order within each side
pub fn partition(items: &[PaymentItem]) -> Partition<'_> {
    let mut out = Partition::default();

    for item in items {
        let missing = item.bank.missing_fields();
        if missing.is_empty() {
            out.bankable.push(item);
        } else {
            debug!(
                "Excluding item {} ({}): missing {}",
                item.id,
                item.payee_name,
                missing.join(", ")
            );
            out.excluded.push(item);
        }
    }

    out
}
