use arkitek_common::{BenchmarkRun, ClusterLink, TestRun};

pub fn print_links(links: &[ClusterLink]) {
    println!("\n=== Arkitek Cluster Links ===");
    if links.is_empty() {
        println!("No cluster links registered.");
        return;
    }

    println!(
        "{:<38} {:<20} {:<12} {:<26} {:<40}",
        "ID", "Name", "Builder", "Created", "Endpoint"
    );
    println!("{:-<140}", "");
    for link in links {
        println!(
            "{:<38} {:<20} {:<12} {:<26} {:<40}",
            link.id,
            link.name,
            link.builder_type,
            link.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
            link.endpoint
        );
    }
    println!();
}

pub fn print_link(link: &ClusterLink) {
    println!("  id:          {}", link.id);
    println!("  name:        {}", link.name);
    println!("  endpoint:    {}", link.endpoint);
    println!("  builderType: {}", link.builder_type);
    println!("  createdAt:   {}", link.created_at.to_rfc3339());
}

pub fn print_benchmark(run: &BenchmarkRun) {
    println!(
        "✓ Benchmark '{}' started against {} ({} iterations) at {}",
        run.test_type,
        run.endpoint,
        run.iterations,
        run.start_time.to_rfc3339()
    );
}

pub fn print_test_run(run: &TestRun) {
    println!("✓ {} (max {} iterations)", run.message, run.max_iterations);
}
