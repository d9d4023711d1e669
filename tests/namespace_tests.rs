#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use brrtplus::host::{Mount, RouteTable};
use brrtplus::{ApiInfo, InfoOverrides, Namespace, Registry, RouteOptions};
use common::{echo, fetch};
use std::sync::Arc;

fn bound() -> (Arc<RouteTable>, Registry) {
    let app = Arc::new(RouteTable::new());
    let registry = Registry::with_app(app.clone(), ApiInfo::default());
    (app, registry)
}

fn reply(value: &str) -> RouteOptions {
    RouteOptions::new().arg("reply", value)
}

#[test]
fn test_namespace_single_route() {
    let (app, api) = bound();
    let ns = api.namespace("TestNamespace");
    ns.route(["/first_handler"], reply("[0]"))
        .to(echo("SomeFirstHandler"))
        .unwrap();

    assert_eq!(
        fetch(&app, "/TestNamespace/first_handler").as_deref(),
        Some("SomeFirstHandler [0]")
    );
}

#[test]
fn test_namespace_multiple_routes() {
    let (app, api) = bound();
    let ns = api.namespace("ns");
    ns.route(["/first_handler"], reply("[1]")).to(echo("FirstTestHandler")).unwrap();
    ns.route(["/second_handler"], reply("[2]")).to(echo("SecondTestHandler")).unwrap();
    ns.route(["/third_handler"], reply("[3]")).to(echo("ThirdTestHandler")).unwrap();

    assert_eq!(fetch(&app, "/ns/first_handler").as_deref(), Some("FirstTestHandler [1]"));
    assert_eq!(fetch(&app, "/ns/second_handler").as_deref(), Some("SecondTestHandler [2]"));
    assert_eq!(fetch(&app, "/ns/third_handler").as_deref(), Some("ThirdTestHandler [3]"));
}

#[test]
fn test_multiple_namespaces() {
    let (app, api) = bound();
    let ns1 = api.namespace("first_ns");
    let ns2 = api.namespace("second_ns");
    ns1.route(["/first_handler"], reply("[1]")).to(echo("FirstTestHandler")).unwrap();
    ns1.route(["/second_handler"], reply("[2]")).to(echo("SecondTestHandler")).unwrap();
    ns2.route(["/third_handler"], reply("[3]")).to(echo("ThirdTestHandler")).unwrap();
    ns2.route(["/fourth_handler"], reply("[4]")).to(echo("FourthTestHandler")).unwrap();

    assert_eq!(fetch(&app, "/first_ns/first_handler").as_deref(), Some("FirstTestHandler [1]"));
    assert_eq!(fetch(&app, "/first_ns/second_handler").as_deref(), Some("SecondTestHandler [2]"));
    assert_eq!(fetch(&app, "/second_ns/third_handler").as_deref(), Some("ThirdTestHandler [3]"));
    assert_eq!(fetch(&app, "/second_ns/fourth_handler").as_deref(), Some("FourthTestHandler [4]"));
    assert!(fetch(&app, "/first_ns/third_handler").is_none());
}

#[test]
fn test_stacked_routes() {
    let (app, api) = bound();
    let ns = api.namespace("ns");

    // Innermost declaration first.
    let first = ns
        .route(["/third_route_first_handler"], reply("[3]"))
        .to(echo("FirstTestHandler"))
        .unwrap();
    let first = ns.route(["/second_route_first_handler"], reply("[2]")).to(first).unwrap();
    let first = ns.route(["/first_route_first_handler"], reply("[1]")).to(first).unwrap();

    let second = ns
        .route(["/second_route_second_handler"], reply("[5]"))
        .to(echo("SecondTestHandler"))
        .unwrap();
    ns.route(["/first_route_second_handler"], reply("[4]")).to(second).unwrap();

    assert_eq!(fetch(&app, "/ns/first_route_first_handler").as_deref(), Some("FirstTestHandler [1]"));
    assert_eq!(fetch(&app, "/ns/second_route_first_handler").as_deref(), Some("FirstTestHandler [2]"));
    assert_eq!(fetch(&app, "/ns/third_route_first_handler").as_deref(), Some("FirstTestHandler [3]"));
    assert_eq!(fetch(&app, "/ns/first_route_second_handler").as_deref(), Some("SecondTestHandler [4]"));
    assert_eq!(fetch(&app, "/ns/second_route_second_handler").as_deref(), Some("SecondTestHandler [5]"));

    // Bottom-up registration order, all resolving to the same handler.
    assert_eq!(
        app.patterns()[..3].to_vec(),
        vec![
            "/ns/third_route_first_handler",
            "/ns/second_route_first_handler",
            "/ns/first_route_first_handler",
        ]
    );
    let a = app.route("/ns/first_route_first_handler").unwrap().handler;
    let b = app.route("/ns/third_route_first_handler").unwrap().handler;
    assert!(a.same_as(&b));
    assert!(a.same_as(&first));
}

#[test]
fn test_multiple_paths_in_single_route() {
    let (app, api) = bound();
    let ns = api.namespace("ns");
    ns.route(
        [
            "/first_path_first_handler",
            "/second_path_first_handler",
            "/third_path_first_handler",
        ],
        reply("[1]"),
    )
    .to(echo("FirstTestHandler"))
    .unwrap();
    ns.route(
        ["/first_path_second_handler", "/second_path_second_handler"],
        reply("[2]"),
    )
    .to(echo("SecondTestHandler"))
    .unwrap();

    for path in [
        "/ns/first_path_first_handler",
        "/ns/second_path_first_handler",
        "/ns/third_path_first_handler",
    ] {
        assert_eq!(fetch(&app, path).as_deref(), Some("FirstTestHandler [1]"));
    }
    for path in ["/ns/first_path_second_handler", "/ns/second_path_second_handler"] {
        assert_eq!(fetch(&app, path).as_deref(), Some("SecondTestHandler [2]"));
    }

    let p1 = app.route("/ns/first_path_second_handler").unwrap();
    let p2 = app.route("/ns/second_path_second_handler").unwrap();
    assert!(p1.handler.same_as(&p2.handler));
    assert_eq!(p1.options, p2.options);
}

#[test]
fn test_prefixes() {
    let app = Arc::new(RouteTable::new());
    let api = Registry::with_app(
        Arc::new(Mount::new("/api_prefix", app.clone())),
        ApiInfo::default(),
    );
    let ns = api.namespace("ns_prexif");
    ns.route(["/some_endpoint"], reply("[0]")).to(echo("SomeHandler")).unwrap();

    assert_eq!(
        fetch(&app, "/api_prefix/ns_prexif/some_endpoint").as_deref(),
        Some("SomeHandler [0]")
    );
}

#[test]
fn test_namespaces_lazy_loading() {
    let ns1 = Namespace::new("first_ns");
    let ns2 = Namespace::new("second_ns");
    ns1.route(["/first_handler"], reply("[1]")).to(echo("FirstTestHandler")).unwrap();
    ns1.route(["/second_handler"], reply("[2]")).to(echo("SecondTestHandler")).unwrap();
    ns2.route(["/third_handler"], reply("[3]")).to(echo("ThirdTestHandler")).unwrap();
    ns2.route(["/fourth_handler"], reply("[4]")).to(echo("FourthTestHandler")).unwrap();

    let (app, api) = bound();
    assert!(app.is_empty());
    api.add_namespace(&ns1, None).unwrap();
    api.add_namespace(&ns2, None).unwrap();

    assert_eq!(fetch(&app, "/first_ns/first_handler").as_deref(), Some("FirstTestHandler [1]"));
    assert_eq!(fetch(&app, "/first_ns/second_handler").as_deref(), Some("SecondTestHandler [2]"));
    assert_eq!(fetch(&app, "/second_ns/third_handler").as_deref(), Some("ThirdTestHandler [3]"));
    assert_eq!(fetch(&app, "/second_ns/fourth_handler").as_deref(), Some("FourthTestHandler [4]"));
}

#[test]
fn test_multiple_apis_and_namespaces() {
    let app = Arc::new(RouteTable::new());
    let api1 = Registry::with_app(Arc::new(Mount::new("/api1", app.clone())), ApiInfo::default());
    let api2 = Registry::with_app(Arc::new(Mount::new("/api2", app.clone())), ApiInfo::default());
    let ns1 = Namespace::new("ns1");
    let ns2 = Namespace::new("ns2");
    let ns3 = Namespace::new("ns3");

    ns1.route(["/first_handler"], reply("[1]")).to(echo("FirstTestHandler")).unwrap();
    ns1.route(["/second_handler"], reply("[2]")).to(echo("SecondTestHandler")).unwrap();
    ns2.route(["/third_handler"], reply("[3]")).to(echo("ThirdTestHandler")).unwrap();
    let fourth = ns3
        .route(["/fourth_handler"], reply("[5]"))
        .to(echo("FourthTestHandler"))
        .unwrap();
    ns2.route(["/fourth_handler"], reply("[4]")).to(fourth).unwrap();

    api1.add_namespace(&ns1, None).unwrap();
    api1.add_namespace(&ns2, None).unwrap();
    api2.add_namespace(&ns2, None).unwrap();
    api2.add_namespace(&ns3, None).unwrap();

    assert_eq!(fetch(&app, "/api1/ns1/first_handler").as_deref(), Some("FirstTestHandler [1]"));
    assert_eq!(fetch(&app, "/api1/ns1/second_handler").as_deref(), Some("SecondTestHandler [2]"));
    assert_eq!(fetch(&app, "/api1/ns2/third_handler").as_deref(), Some("ThirdTestHandler [3]"));
    assert_eq!(fetch(&app, "/api2/ns2/third_handler").as_deref(), Some("ThirdTestHandler [3]"));
    assert_eq!(fetch(&app, "/api2/ns2/fourth_handler").as_deref(), Some("FourthTestHandler [4]"));
    assert_eq!(fetch(&app, "/api2/ns3/fourth_handler").as_deref(), Some("FourthTestHandler [5]"));
    assert!(fetch(&app, "/api1/ns3/fourth_handler").is_none());
    assert_eq!(ns2.registry_count(), 2);
}

#[test]
fn test_lazy_loading_through_factory() {
    let api = Registry::default();
    let ns = api.namespace("TestNamespace");
    ns.route(["/some_endpoint"], reply("[0]")).to(echo("SomeHandler")).unwrap();

    let app = Arc::new(RouteTable::new());
    assert!(fetch(&app, "/TestNamespace/some_endpoint").is_none());
    api.init_app(app.clone(), InfoOverrides::default()).unwrap();
    assert_eq!(
        fetch(&app, "/TestNamespace/some_endpoint").as_deref(),
        Some("SomeHandler [0]")
    );
}

#[test]
fn test_explicit_namespace_path() {
    let (app, api) = bound();
    let ns = Namespace::builder("ignored").path("//v2/things//").build();
    api.add_namespace(&ns, None).unwrap();
    ns.route(["{id}"], reply("[x]")).to(echo("Thing")).unwrap();

    let matched = app.route("/v2/things/17").unwrap();
    assert_eq!(matched.pattern, "/v2/things/{id}");
    assert_eq!(matched.get_path_param("id"), Some("17"));
}
