use super::*;
use ingress_merge_core::{
    config::{
        DestinationPolicySpec, EdgeGatewaySpec, HttpRouteRule, LoadBalancer, RoutingRuleSpec,
        Server, ServerPort, TrafficPolicy,
    },
    Spec, INGRESS_GATEWAY_NAME,
};

const CLUSTER: &str = "gw-123-istio";

fn cluster() -> ClusterId {
    ClusterId::new(CLUSTER)
}

fn authored_name(domain: &str) -> String {
    format!("{CLUSTER}-{}", domain.replace('.', "-"))
}

fn generated_name(domain: &str) -> String {
    format!("{INGRESS_GATEWAY_NAME}-{}", domain.replace('.', "-"))
}

fn mk_routing_rule(name: &str, rules: &[&str]) -> ConfigEntry {
    ConfigEntry::new(
        "test",
        name,
        RoutingRuleSpec {
            http: rules.iter().map(|r| HttpRouteRule::named(*r)).collect(),
            ..Default::default()
        },
    )
}

fn mk_gateway(name: &str, server: &str) -> ConfigEntry {
    ConfigEntry::new(
        "test",
        name,
        EdgeGatewaySpec {
            servers: vec![Server {
                name: server.to_string(),
                port: ServerPort {
                    number: 80,
                    protocol: "HTTP".to_string(),
                    name: "http".to_string(),
                },
                hosts: vec!["*".to_string()],
                tls: None,
            }],
            ..Default::default()
        },
    )
}

fn mk_destination_policy(name: &str, lb: LoadBalancer) -> ConfigEntry {
    ConfigEntry::new(
        "test",
        name,
        DestinationPolicySpec {
            host: "test.default.svc.cluster.local".to_string(),
            traffic_policy: Some(TrafficPolicy {
                load_balancer: Some(lb),
            }),
        },
    )
}

fn rule_names(entry: &ConfigEntry) -> Vec<&str> {
    match &entry.spec {
        Spec::RoutingRule(spec) => spec.http.iter().map(|r| r.name.as_str()).collect(),
        spec => panic!("expected a routing rule, got {:?}", spec.kind()),
    }
}

fn server_names(entry: &ConfigEntry) -> Vec<&str> {
    match &entry.spec {
        Spec::EdgeGateway(spec) => spec.servers.iter().map(|s| s.name.as_str()).collect(),
        spec => panic!("expected an edge gateway, got {:?}", spec.kind()),
    }
}

#[test]
fn routing_rules_append_generated_after_authored() {
    tracing_subscriber::fmt().try_init().ok();

    let out = reconcile_routing_rules(
        &cluster(),
        vec![
            mk_routing_rule(&authored_name("test.com"), &["route-1"]),
            mk_routing_rule(&generated_name("test.com"), &["route-2"]),
        ],
    );

    assert!(out.errors.is_empty());
    assert_eq!(out.entries.len(), 1);
    assert_eq!(out.entries[0].name(), "gw-123-istio-test-com");
    assert_eq!(rule_names(&out.entries[0]), ["route-1", "route-2"]);
}

#[test]
fn routing_rules_one_entry_per_host() {
    let out = reconcile_routing_rules(
        &cluster(),
        vec![
            mk_routing_rule(&authored_name("test.com"), &["route-1", "route-3"]),
            mk_routing_rule(&generated_name("test.com"), &["route-2"]),
            mk_routing_rule(&generated_name("foo.com"), &["route-1"]),
            mk_routing_rule(&generated_name("bar.com"), &["route-1", "route-4"]),
        ],
    );

    assert!(out.errors.is_empty());
    assert_eq!(out.entries.len(), 3);
    for entry in &out.entries {
        assert!(
            entry.name().starts_with(CLUSTER),
            "{} must have prefix {CLUSTER}",
            entry.name()
        );
    }

    let merged = out.get("test", "gw-123-istio-test-com").unwrap();
    assert_eq!(rule_names(merged), ["route-1", "route-3", "route-2"]);
    let bar = out.get("test", "gw-123-istio-bar-com").unwrap();
    assert_eq!(rule_names(bar), ["route-1", "route-4"]);
    assert!(out.get("test", "gw-123-istio-foo-com").is_some());
}

#[test]
fn routing_rules_for_default_cluster() {
    let out = reconcile_routing_rules(
        &ClusterId::default(),
        vec![
            mk_routing_rule("test-com", &["route-1"]),
            mk_routing_rule(&generated_name("test.com"), &["route-2"]),
            mk_routing_rule(&generated_name("foo.com"), &["route-3"]),
        ],
    );

    let names = out.entries.iter().map(ConfigEntry::name).collect::<Vec<_>>();
    assert_eq!(names, ["foo-com", "test-com"]);
    assert_eq!(rule_names(&out.entries[1]), ["route-1", "route-2"]);
}

#[test]
fn duplicate_generated_routing_rules_are_merged() {
    let out = reconcile_routing_rules(
        &cluster(),
        vec![
            mk_routing_rule(&generated_name("foo.com"), &["route-1"]),
            mk_routing_rule(&generated_name("foo.com"), &["route-2"]),
        ],
    );

    assert_eq!(out.entries.len(), 1);
    assert_eq!(rule_names(&out.entries[0]), ["route-1", "route-2"]);
}

#[test]
fn gateways_are_shadowed_by_authored() {
    let authored = mk_gateway(&authored_name("test.com"), "server-1");
    let out = reconcile_edge_gateways(
        &cluster(),
        vec![
            authored.clone(),
            mk_gateway(&generated_name("test.com"), "server-2"),
            mk_gateway(&generated_name("foo.com"), "server-1"),
            mk_gateway(&generated_name("bar.com"), "server-1"),
        ],
    );

    assert!(out.errors.is_empty());
    assert_eq!(out.entries.len(), 3);
    for entry in &out.entries {
        assert!(entry.name().starts_with(CLUSTER), "{}", entry.name());
    }
    assert_eq!(
        out.get("test", "gw-123-istio-test-com"),
        Some(&authored),
        "authored gateway must be unchanged"
    );

    let foo = out.get("test", "gw-123-istio-foo-com").unwrap();
    assert_eq!(server_names(foo), ["server-1"]);
}

#[test]
fn destination_policies_are_not_qualified_with_cluster() {
    let hash = "e3431b3db77d88642015e60647514d2f";
    let authored = mk_destination_policy(hash, LoadBalancer::LeastConn);
    let out = reconcile_destination_policies(
        &cluster(),
        vec![
            authored.clone(),
            mk_destination_policy(
                &format!("{INGRESS_GATEWAY_NAME}-{hash}"),
                LoadBalancer::Random,
            ),
        ],
    );

    assert_eq!(out.entries, vec![authored]);

    let out = reconcile_destination_policies(
        &cluster(),
        vec![mk_destination_policy(
            &format!("{INGRESS_GATEWAY_NAME}-{hash}"),
            LoadBalancer::Random,
        )],
    );
    assert_eq!(out.entries.len(), 1);
    assert_eq!(out.entries[0].name(), hash);
}

#[test]
fn last_authored_entry_wins() {
    let out = reconcile_routing_rules(
        &cluster(),
        vec![
            mk_routing_rule("shared", &["first"]),
            mk_routing_rule("shared", &["second"]),
        ],
    );

    assert_eq!(out.entries.len(), 1);
    assert_eq!(rule_names(&out.entries[0]), ["second"]);
}

#[test]
fn mismatched_specs_are_reported() {
    let mut declared_gateway = mk_routing_rule("declared-gateway", &["route-1"]);
    declared_gateway.meta.kind = Kind::EdgeGateway;

    let out = reconcile_routing_rules(
        &cluster(),
        vec![
            mk_routing_rule(&authored_name("test.com"), &["route-1"]),
            mk_gateway(&generated_name("test.com"), "server-1"),
            declared_gateway,
            mk_routing_rule(&generated_name("foo.com"), &["route-2"]),
        ],
    );

    assert_eq!(
        out.errors,
        vec![
            ReconcileError::InvalidSpecKind {
                namespace: "test".to_string(),
                name: generated_name("test.com"),
                expected: Kind::RoutingRule,
                declared: Kind::EdgeGateway,
                found: Kind::EdgeGateway,
            },
            ReconcileError::InvalidSpecKind {
                namespace: "test".to_string(),
                name: "declared-gateway".to_string(),
                expected: Kind::RoutingRule,
                declared: Kind::EdgeGateway,
                found: Kind::RoutingRule,
            },
        ]
    );
    assert_eq!(
        out.errors[0].to_string(),
        "test/istio-ingressgateway-test-com: expected routing-rule, found edge-gateway with edge-gateway spec"
    );

    // Remaining entries are still reconciled.
    assert_eq!(out.entries.len(), 2);
    let test = out.get("test", "gw-123-istio-test-com").unwrap();
    assert_eq!(rule_names(test), ["route-1"]);
    assert!(out.get("test", "gw-123-istio-foo-com").is_some());
}

#[test]
fn reconciliation_is_idempotent() {
    let reconciler = Reconciler::new(cluster());
    for kind in Kind::ALL {
        let input = match kind {
            Kind::RoutingRule => vec![
                mk_routing_rule(&authored_name("test.com"), &["route-1"]),
                mk_routing_rule(&generated_name("test.com"), &["route-2"]),
                mk_routing_rule(&generated_name("foo.com"), &["route-3"]),
            ],
            Kind::EdgeGateway => vec![
                mk_gateway(&authored_name("test.com"), "server-1"),
                mk_gateway(&generated_name("test.com"), "server-2"),
                mk_gateway(&generated_name("bar.com"), "server-3"),
            ],
            Kind::DestinationPolicy => vec![
                mk_destination_policy("abc", LoadBalancer::RoundRobin),
                mk_destination_policy(&generated_name("abc"), LoadBalancer::Random),
                mk_destination_policy(&generated_name("def"), LoadBalancer::Random),
            ],
        };

        let once = reconciler.reconcile_kind(kind, input);
        assert!(
            once.entries
                .iter()
                .all(|e| !is_auto_generated(e.name())),
            "{kind}"
        );
        let twice = reconciler.reconcile_kind(kind, once.entries.clone());
        assert_eq!(once, twice, "{kind}");
    }
}

#[test]
fn names_are_scoped_to_namespaces() {
    let mut other_ns = mk_routing_rule(&generated_name("test.com"), &["route-2"]);
    other_ns.meta.namespace = "other".to_string();
    let input = vec![
        mk_routing_rule(&authored_name("test.com"), &["route-1"]),
        other_ns,
    ];

    let out = Reconciler::new(cluster()).reconcile::<RoutingRules>(input.clone());
    assert_eq!(out.entries.len(), 2);
    assert_eq!(
        rule_names(out.get("other", "gw-123-istio-test-com").unwrap()),
        ["route-2"]
    );
    assert_eq!(
        rule_names(out.get("test", "gw-123-istio-test-com").unwrap()),
        ["route-1"]
    );

    let out = Reconciler::new(cluster())
        .with_scope(NameScope::Cluster)
        .reconcile::<RoutingRules>(input);
    assert_eq!(out.entries.len(), 1);
    assert_eq!(out.entries[0].namespace(), "test");
    assert_eq!(rule_names(&out.entries[0]), ["route-1", "route-2"]);
}

#[test]
fn output_is_ordered_by_namespace_and_name() {
    let mut b = mk_gateway("b", "server-1");
    b.meta.namespace = "a-ns".to_string();
    let out = reconcile_edge_gateways(
        &ClusterId::default(),
        vec![
            mk_gateway("z", "server-1"),
            mk_gateway(&generated_name("c"), "server-1"),
            b,
            mk_gateway("a", "server-1"),
        ],
    );

    let keys = out
        .entries
        .iter()
        .map(|e| (e.namespace(), e.name()))
        .collect::<Vec<_>>();
    assert_eq!(
        keys,
        [("a-ns", "b"), ("test", "a"), ("test", "c"), ("test", "z")]
    );
}
