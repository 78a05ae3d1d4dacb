//! Content pipeline integration tests
//!
//! Audit, generation, classification and export through the public API.

use shop_content_mcp::ai::content::ContentCoordinator;
use shop_content_mcp::catalog::{MemorySink, MockCatalog, UpdateSink};
use shop_content_mcp::config::{AppConfig, RuleConfig};
use shop_content_mcp::types::{IssueType, Priority, Product, Severity};

fn coordinator() -> ContentCoordinator {
    ContentCoordinator::new(&AppConfig::default()).unwrap()
}

fn flawed_cream() -> Product {
    Product::new(
        "prod_001",
        "Organic Face Cream",
        "Good cream for your face. Made with natural stuff.",
    )
}

fn clean_balm() -> Product {
    Product::new(
        "prod_clean",
        "Botanical Balm",
        "Crafted from organic botanicals, this luxury balm restores radiance — shop now and discover visibly softer skin.",
    )
    .with_seo_title("Botanical Balm | Luxury Organic Skincare for Radiant Skin")
    .with_seo_description(
        "Restore radiance with our luxury botanical balm, crafted from organic ingredients for visibly softer skin. Shop now for exclusive offers.",
    )
}

#[test]
fn test_flawed_product_is_fully_rewritten() {
    let coordinator = coordinator();
    let result = coordinator.process(&flawed_cream()).unwrap();

    assert!(result.audit.issues_found >= 6);
    assert_eq!(result.audit.severity, Severity::High);
    assert_eq!(result.priority, Priority::High);
    assert!(result.action_required);

    let optimization = result.optimization.expect("optimization present");
    let description = optimization.optimized_description.expect("description rewritten");
    assert!(description.chars().count() >= 100);
    assert!(coordinator.checker().cta_terms().is_match(&description));
    assert!(optimization.optimized_seo_title.is_some());
    assert!(optimization.optimized_seo_description.is_some());
    assert!(!optimization.improvements_made.is_empty());
}

#[test]
fn test_clean_product_needs_nothing() {
    let result = coordinator().process(&clean_balm()).unwrap();

    assert_eq!(result.audit.issues_found, 0);
    assert_eq!(result.audit.severity, Severity::None);
    assert_eq!(result.priority, Priority::None);
    assert!(!result.action_required);
    assert!(result.optimization.is_none());
}

#[test]
fn test_issue_order_follows_rule_order() {
    let audit = coordinator().checker().audit(&flawed_cream());
    assert_eq!(
        audit.issue_types(),
        vec![
            IssueType::DescriptionLength,
            IssueType::VagueLanguage,
            IssueType::MissingSeoTitle,
            IssueType::MissingSeoDescription,
            IssueType::BrandTone,
            IssueType::MissingCta,
        ]
    );
}

#[test]
fn test_optimized_content_passes_reaudit() {
    let coordinator = coordinator();

    for product in MockCatalog::products() {
        let result = coordinator.process(&product).unwrap();
        let Some(optimization) = &result.optimization else {
            continue;
        };

        let updated = optimization.apply_to(&product);
        let reaudit = coordinator.checker().audit(&updated);
        assert_eq!(
            reaudit.issues_found, 0,
            "{} still has issues: {:?}",
            product.id, reaudit.issues
        );
    }
}

#[test]
fn test_processing_is_deterministic() {
    let coordinator = coordinator();
    let products = MockCatalog::products();
    assert_eq!(
        coordinator.process_batch(&products),
        coordinator.process_batch(&products)
    );
}

#[test]
fn test_batch_isolates_failures() {
    let coordinator = coordinator();
    let products = vec![
        flawed_cream(),
        Product::new("", "No Identifier", "Good stuff."),
        clean_balm(),
    ];

    let results = coordinator.process_batch(&products);
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].product_id, "prod_001");
    assert!(results[1].is_failed());
    assert_eq!(results[2].product_id, "prod_clean");

    let stats = coordinator.statistics(&results);
    assert_eq!(stats.total_products, 3);
    assert_eq!(stats.failed_products, 1);
    assert_eq!(stats.products_optimized, 1);
}

#[test]
fn test_statistics_for_mock_catalog() {
    let coordinator = coordinator();
    let results = coordinator.process_batch(&MockCatalog::products());
    let stats = coordinator.statistics(&results);

    assert_eq!(stats.total_products, 3);
    assert_eq!(stats.products_with_issues, 2);
    assert_eq!(stats.products_optimized, 2);
    assert_eq!(stats.count_for(Priority::High), 2);
    assert_eq!(stats.count_for(Priority::None), 1);
    assert_eq!(stats.count_for(Priority::Critical), 0);
    assert_eq!(stats.priority_breakdown.len(), 5);
    assert!((stats.completion_rate - 2.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_empty_batch_statistics() {
    let coordinator = coordinator();
    let stats = coordinator.statistics(&[]);
    assert_eq!(stats.total_products, 0);
    assert_eq!(stats.completion_rate, 0.0);
    assert_eq!(stats.completion_percent(), "0.0%");
}

#[test]
fn test_export_keeps_input_order() {
    let coordinator = coordinator();
    let results = coordinator.process_batch(&MockCatalog::products());
    let payloads = coordinator.export(&results);

    let ids: Vec<&str> = payloads.iter().map(|p| p.product_id.as_str()).collect();
    assert_eq!(ids, vec!["prod_001", "prod_002"]);

    let sink = MemorySink::new();
    sink.publish(&payloads).unwrap();
    assert_eq!(sink.published(), payloads);
}

#[test]
fn test_priority_filter() {
    let coordinator = coordinator();
    let products = MockCatalog::products();

    let urgent = coordinator.process_batch_with_filter(&products, Priority::Medium);
    assert_eq!(urgent.len(), 2);
    assert!(urgent.iter().all(|r| r.priority >= Priority::Medium));
}

#[test]
fn test_benefit_rule_is_opt_in() {
    let config = AppConfig {
        rules: RuleConfig::default().with_benefit_words(RuleConfig::default_benefit_words()),
        ..AppConfig::default()
    };
    let opted_in = ContentCoordinator::new(&config).unwrap();

    let audit = opted_in.checker().audit(&clean_balm());
    assert_eq!(audit.issue_types(), vec![IssueType::MissingBenefits]);
    assert_eq!(audit.severity, Severity::Low);

    let default_audit = coordinator().checker().audit(&clean_balm());
    assert!(!default_audit.has_issue(IssueType::MissingBenefits));
}

#[test]
fn test_custom_thresholds() {
    let config = AppConfig {
        rules: RuleConfig {
            min_description_length: 20,
            ..RuleConfig::default()
        },
        ..AppConfig::default()
    };
    let coordinator = ContentCoordinator::new(&config).unwrap();

    let audit = coordinator.checker().audit(&flawed_cream());
    assert!(!audit.has_issue(IssueType::DescriptionLength));
    assert!(audit.has_issue(IssueType::VagueLanguage));
}
