//! Previous/next navigation.
//!
//! The tree is flattened depth-first (groups expanded in place) into a
//! reading order, and each document is linked to its neighbors in it.

use crate::document::{NavLink, Navigation};
use crate::store::ContentStore;
use crate::tree::{DocItem, TreeItem};

/// Document leaves in depth-first tree order.
pub fn flatten(tree: &[TreeItem]) -> Vec<&DocItem> {
    let mut out = Vec::new();
    collect(tree, &mut out);
    out
}

fn collect<'t>(items: &'t [TreeItem], out: &mut Vec<&'t DocItem>) {
    for item in items {
        match item {
            TreeItem::Doc(doc) => out.push(doc),
            TreeItem::Group(group) => collect(&group.items, out),
        }
    }
}

fn link_to(item: &DocItem) -> NavLink {
    NavLink {
        title: item.label.clone(),
        slug: item.slug.clone(),
        label: item.label.clone(),
    }
}

/// Recompute navigation for every stored document.
///
/// Documents absent from the tree get empty navigation. Tree leaves whose
/// slug is not in the store are skipped.
pub(crate) fn link(tree: &[TreeItem], store: &mut ContentStore) {
    for doc in store.iter_mut() {
        doc.navigation = Navigation::default();
    }

    let order = flatten(tree);
    for (i, item) in order.iter().enumerate() {
        let Some(doc) = store.get_by_slug_mut(&item.slug) else {
            continue;
        };
        doc.navigation = Navigation {
            previous: i.checked_sub(1).map(|p| link_to(order[p])),
            next: order.get(i + 1).map(|n| link_to(n)),
        };
    }
}
