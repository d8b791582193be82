//! Summaries derived from a trip's final lines for downstream rendering.

use crate::model::OrderLine;
use crate::normalize::{main_model_key, normalize_code, sub_variant_side, Side};
use crate::rules::schema::AnnotationDef;
use crate::split::Fraction;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Container total for one group of interest within a trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupAnnotation {
    pub group_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub quantity: u64,
    pub containers: u64,
}

/// Per-group container totals for the groups named in `def`.
///
/// Each line contributes `ceil(quantity / capacity)`; a group with any
/// quantity counts at least one container. Groups without quantity are
/// left out. Output follows `def.priority`, unranked groups last.
pub fn build_group_annotations(lines: &[OrderLine], def: &AnnotationDef) -> Vec<GroupAnnotation> {
    let mut groups: Vec<String> = Vec::new();
    for code in def.groups.iter().filter_map(|g| normalize_code(g)) {
        if !groups.contains(&code) {
            groups.push(code);
        }
    }
    let priority: Vec<String> = def.priority.iter().filter_map(|g| normalize_code(g)).collect();

    let mut annotations: Vec<GroupAnnotation> = groups
        .into_iter()
        .filter_map(|code| {
            let members = lines
                .iter()
                .filter(|l| l.normalized_group().as_deref() == Some(code.as_str()));
            let (quantity, containers) = members.fold((0u64, 0u64), |(q, c), l| {
                (
                    q.saturating_add(l.effective_quantity()),
                    c.saturating_add(l.containers()),
                )
            });
            if quantity == 0 {
                return None;
            }
            let display_name = def
                .display_names
                .iter()
                .find(|(k, _)| normalize_code(k).as_deref() == Some(code.as_str()))
                .map(|(_, v)| v.clone());
            Some(GroupAnnotation {
                group_code: code,
                display_name,
                quantity,
                containers: containers.max(1),
            })
        })
        .collect();

    annotations.sort_by_key(|a| {
        priority
            .iter()
            .position(|p| *p == a.group_code)
            .unwrap_or(usize::MAX)
    });
    annotations
}

/// Headline figures for one trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripSummary {
    /// Lines with a positive quantity.
    pub product_kinds: usize,
    pub total_quantity: u64,
    /// `ceil` of the exact summed usage.
    pub total_containers: u64,
    /// Summed usage, for display only.
    pub container_usage: Decimal,
}

pub fn summarize(lines: &[OrderLine]) -> TripSummary {
    let usage: Fraction = lines
        .iter()
        .map(|l| Fraction::usage(l.effective_quantity(), l.effective_capacity()))
        .sum();
    TripSummary {
        product_kinds: lines.iter().filter(|l| l.effective_quantity() > 0).count(),
        total_quantity: saturating_sum(lines.iter().map(|l| l.effective_quantity())),
        total_containers: usage.ceil_count(),
        container_usage: usage.to_decimal(),
    }
}

fn saturating_sum(values: impl Iterator<Item = u64>) -> u64 {
    values.fold(0, u64::saturating_add)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Rides in the last container of the main model.
    WithMain,
    /// Left and right variants share one container.
    MergedPair,
    /// Each variant line fills its own containers.
    Separate,
}

/// How the sub-variants of one main model are loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubVariantPlacement {
    pub main_model: String,
    pub placement: Placement,
    pub order_ids: Vec<String>,
    pub quantity: u64,
    /// Containers needed beyond those of the main model.
    pub extra_containers: u64,
}

/// Pair sub-variant lines (group `sub_group`) with their main model.
///
/// Lines with zero quantity are ignored. Output follows the order in which
/// each main model first appears among the sub-variant lines.
///
/// `Separate` lines are sized by their own `capacity`. A sub-variant ships
/// in its main model's container type, so upstream should join the main
/// model's container capacity onto sub-variant lines; this module has no
/// product-to-container lookup of its own.
pub fn place_sub_variants(lines: &[OrderLine], sub_group: &str) -> Vec<SubVariantPlacement> {
    let Some(sub_group) = normalize_code(sub_group) else {
        return Vec::new();
    };
    let active = lines.iter().filter(|l| l.effective_quantity() > 0);
    let (subs, mains): (Vec<&OrderLine>, Vec<&OrderLine>) =
        active.partition(|l| l.normalized_group().as_deref() == Some(sub_group.as_str()));

    let main_keys: Vec<String> = mains
        .iter()
        .filter_map(|l| l.model_name.as_deref().and_then(main_model_key))
        .collect();

    let mut grouped: Vec<(String, Vec<&OrderLine>)> = Vec::new();
    for sub in subs {
        let Some(key) = sub.model_name.as_deref().and_then(main_model_key) else {
            continue;
        };
        match grouped.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(sub),
            None => grouped.push((key, vec![sub])),
        }
    }

    grouped
        .into_iter()
        .map(|(main_model, members)| {
            let sides: Vec<Option<Side>> = members
                .iter()
                .map(|l| l.model_name.as_deref().and_then(sub_variant_side))
                .collect();
            let has_left = sides.contains(&Some(Side::Left));
            let has_right = sides.contains(&Some(Side::Right));

            let (placement, extra_containers): (Placement, u64) =
                if main_keys.contains(&main_model) {
                    (Placement::WithMain, 0)
                } else if has_left && has_right {
                    (Placement::MergedPair, 1)
                } else {
                    (
                        Placement::Separate,
                        saturating_sum(members.iter().map(|l| l.containers())),
                    )
                };

            SubVariantPlacement {
                main_model,
                placement,
                order_ids: members.iter().map(|l| l.order_id.clone()).collect(),
                quantity: saturating_sum(members.iter().map(|l| l.effective_quantity())),
                extra_containers,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::*;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn def(groups: &[&str], priority: &[&str]) -> AnnotationDef {
        AnnotationDef {
            trip: "trip2".into(),
            groups: groups.iter().map(|g| g.to_string()).collect(),
            priority: priority.iter().map(|g| g.to_string()).collect(),
            display_names: BTreeMap::new(),
        }
    }

    #[test]
    fn test_group_totals_sum_line_ceilings() {
        let lines = vec![
            with_group(line("a", 5, Some(2)), "SIGA"),
            with_group(line("b", 1, Some(4)), "siga"),
            with_group(line("c", 3, Some(3)), "KANTATSU"),
        ];
        let out = build_group_annotations(&lines, &def(&["SIGA", "KANTATSU"], &[]));
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].group_code, "SIGA");
        assert_eq!(out[0].containers, 4);
        assert_eq!(out[0].quantity, 6);
        assert_eq!(out[1].containers, 1);
    }

    #[test]
    fn test_zero_groups_omitted() {
        let lines = vec![
            with_group(line("a", 0, Some(2)), "SIGA"),
            with_group(line("c", 3, Some(3)), "KANTATSU"),
        ];
        let out = build_group_annotations(&lines, &def(&["SIGA", "KANTATSU", "OTHER"], &[]));
        let codes: Vec<&str> = out.iter().map(|a| a.group_code.as_str()).collect();
        assert_eq!(codes, vec!["KANTATSU"]);
    }

    #[test]
    fn test_priority_order_with_unranked_last() {
        let lines = vec![
            with_group(line("x", 1, None), "EXTRA"),
            with_group(line("k", 1, None), "KANTATSU"),
            with_group(line("s", 1, None), "SIGA"),
            with_group(line("y", 1, None), "ALSO"),
        ];
        let out = build_group_annotations(
            &lines,
            &def(&["EXTRA", "KANTATSU", "ALSO", "SIGA"], &["SIGA", "KANTATSU"]),
        );
        let codes: Vec<&str> = out.iter().map(|a| a.group_code.as_str()).collect();
        assert_eq!(codes, vec!["SIGA", "KANTATSU", "EXTRA", "ALSO"]);
    }

    #[test]
    fn test_display_names_attached() {
        let mut d = def(&["SIGA"], &[]);
        d.display_names.insert("siga".into(), "滋賀".into());
        let out = build_group_annotations(&[with_group(line("s", 2, Some(5)), "SIGA")], &d);
        assert_eq!(out[0].display_name.as_deref(), Some("滋賀"));
    }

    #[test]
    fn test_summarize_uses_exact_usage() {
        let lines = vec![line("a", 1, Some(3)), line("b", 2, Some(3)), line("c", 0, Some(3))];
        let summary = summarize(&lines);
        assert_eq!(summary.product_kinds, 2);
        assert_eq!(summary.total_quantity, 3);
        assert_eq!(summary.total_containers, 1);
        assert_eq!(summary.container_usage, dec!(1));
    }

    #[test]
    fn test_totals_saturate_on_huge_quantities() {
        let lines = vec![
            with_group(line("a", i64::MAX, Some(1)), "SIGA"),
            with_group(line("b", i64::MAX, Some(1)), "SIGA"),
            with_group(line("c", i64::MAX, Some(1)), "SIGA"),
        ];
        let summary = summarize(&lines);
        assert_eq!(summary.total_quantity, u64::MAX);
        assert_eq!(summary.total_containers, u64::MAX);
        assert_eq!(summary.product_kinds, 3);

        let out = build_group_annotations(&lines, &def(&["SIGA"], &[]));
        assert_eq!(out[0].quantity, u64::MAX);
        assert_eq!(out[0].containers, u64::MAX);
    }

    fn sub(id: &str, model: &str, qty: i64, cap: i64) -> OrderLine {
        with_group(with_model(line(id, qty, Some(cap)), model), "SUB_BLADE")
    }

    #[test]
    fn test_sub_variant_with_main() {
        let lines = vec![
            with_model(line("m", 4, Some(2)), "17U"),
            sub("l", "17U-L", 1, 2),
            sub("r", "17U-R", 1, 2),
        ];
        let out = place_sub_variants(&lines, "SUB_BLADE");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].main_model, "17U");
        assert_eq!(out[0].placement, Placement::WithMain);
        assert_eq!(out[0].order_ids, vec!["l", "r"]);
        assert_eq!(out[0].extra_containers, 0);
    }

    #[test]
    fn test_sub_variant_pair_merged() {
        let lines = vec![sub("l", "26U-L", 2, 1), sub("r", "26U-R", 2, 1)];
        let out = place_sub_variants(&lines, "sub_blade");
        assert_eq!(out[0].placement, Placement::MergedPair);
        assert_eq!(out[0].extra_containers, 1);
        assert_eq!(out[0].quantity, 4);
    }

    #[test]
    fn test_single_side_separate() {
        let lines = vec![sub("l", "20U-L", 5, 2), sub("l2", "20U-L", 1, 2)];
        let out = place_sub_variants(&lines, "SUB_BLADE");
        assert_eq!(out[0].placement, Placement::Separate);
        assert_eq!(out[0].extra_containers, 4);
    }

    #[test]
    fn test_separate_sized_by_each_line_capacity() {
        let lines = vec![sub("r", "391-R", 7, 3), sub("r2", "391-R", 7, 7)];
        let out = place_sub_variants(&lines, "SUB_BLADE");
        assert_eq!(out[0].placement, Placement::Separate);
        // ceil(7 / 3) + ceil(7 / 7)
        assert_eq!(out[0].extra_containers, 4);
    }

    #[test]
    fn test_zero_quantity_sub_ignored() {
        let lines = vec![sub("l", "20U-L", 0, 2)];
        assert!(place_sub_variants(&lines, "SUB_BLADE").is_empty());
    }
}
