use shipplan_core::annotate::Placement;
use shipplan_core::trace::TraceSeverity;
use shipplan_core::{ShippingPlan, TripPlan};

pub fn print(plans: &[ShippingPlan], show_zero: bool, trace: bool) {
    for (i, plan) in plans.iter().enumerate() {
        if i > 0 {
            println!();
        }
        match plan.customer.as_deref() {
            Some(customer) => println!(
                "=== {} / {} ({}) ===\n",
                plan.config_name, customer, plan.date
            ),
            None => println!("=== {} ({}) ===\n", plan.config_name, plan.date),
        }

        for trip in &plan.trips {
            print_trip(trip, show_zero);
        }

        if let Some(ref split) = plan.split {
            println!(
                "  Split: {} containers -> {} + {} (usage {} = {} + {})",
                split.total_containers,
                split.primary_containers,
                split.overflow_containers,
                split.total_usage,
                split.primary_usage,
                split.overflow_usage
            );
            if split.topped_up > 0 {
                println!("    {} unit(s) moved by top-up", split.topped_up);
            }
            println!();
        }

        if !plan.excluded_order_ids.is_empty() {
            println!("  Excluded: {}\n", plan.excluded_order_ids.join(", "));
        }

        if !plan.anomalies.is_empty() {
            println!("  Data corrections:");
            for a in &plan.anomalies {
                let original = a
                    .original
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "    {:<12} {:?}: {} -> {}",
                    a.order_id, a.kind, original, a.corrected
                );
            }
            println!();
        }

        if trace {
            print_trace(plan);
        }
    }
}

fn print_trip(trip: &TripPlan, show_zero: bool) {
    let label = trip.label.as_deref().unwrap_or("");
    let departure = trip.departure.as_deref().unwrap_or("--:--");
    println!("  [{}] {} {}", departure, trip.name, label);
    println!(
        "    {} kinds, {} units, {} containers (usage {})",
        trip.summary.product_kinds,
        trip.summary.total_quantity,
        trip.summary.total_containers,
        trip.summary.container_usage
    );

    let shown: Vec<_> = trip
        .lines
        .iter()
        .filter(|l| show_zero || l.order_quantity > 0)
        .collect();

    if !shown.is_empty() {
        let width = shown
            .iter()
            .map(|l| l.display_label().chars().count())
            .max()
            .unwrap_or(10);
        for line in &shown {
            println!(
                "    {:<width$}  {:>6} / {:<4}  {} ctr",
                line.display_label(),
                line.order_quantity,
                line.effective_capacity(),
                line.containers(),
                width = width
            );
        }
    }

    for ann in &trip.annotations {
        let name = ann.display_name.as_deref().unwrap_or(&ann.group_code);
        println!("    * {}: {} container(s)", name, ann.containers);
    }

    for sv in &trip.sub_variants {
        let how = match sv.placement {
            Placement::WithMain => "with main model".to_string(),
            Placement::MergedPair => "L/R in one container".to_string(),
            Placement::Separate => format!("{} separate container(s)", sv.extra_containers),
        };
        println!("    * {} sub-variants: {}", sv.main_model, how);
    }
    println!();
}

fn print_trace(plan: &ShippingPlan) {
    let Some(ref trace) = plan.trace else {
        return;
    };
    println!("  Trace:");
    for entry in &trace.entries {
        println!("    {}", entry.order_id);
        for step in &entry.steps {
            println!("      {:?}: {}", step.step_type, step.message);
        }
    }
    for w in &trace.warnings {
        let marker = match w.severity {
            TraceSeverity::Important => "!",
            TraceSeverity::Info => "i",
        };
        println!("    [{}] {}: {}", marker, w.order_id, w.message);
    }
    println!();
}
