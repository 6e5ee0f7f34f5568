use crate::client::test::scenario::Scenario;
use crate::client::RecvBodyResult;
use crate::redirect::Redirect;

fn to_redirect(location: &str) -> crate::client::Flow<crate::client::state::Redirect> {
    let header = format!("Location: {}", location);
    let scenario = Scenario::builder()
        .respond(&["HTTP/1.1 302 Found", &header, ""])
        .build();

    match scenario.to_recv_body().proceed() {
        RecvBodyResult::Redirect(v) => v,
        RecvBodyResult::Cleanup(_) => unreachable!("location header leads to redirect"),
    }
}

#[test]
fn follow_http_location() {
    let mut flow = to_redirect("http://b.test:8080/x");

    let next = flow.as_new_flow().unwrap();
    assert_eq!(next.host(), "b.test");
    assert_eq!(next.port(), 8080);
    assert_eq!(next.target().path(), "x");

    assert_eq!(flow.close_reason(), Some("following redirect"));
}

#[test]
fn close_reason_follows_latest_cause() {
    let scenario = Scenario::builder()
        .respond(&[
            "HTTP/1.1 302 Found",
            "Location: http://b.test/",
            "Connection: close",
            "",
        ])
        .build();

    let RecvBodyResult::Redirect(mut flow) = scenario.to_recv_body().proceed() else {
        panic!("expected redirect");
    };

    assert_eq!(flow.close_reason(), Some("server sent Connection: close"));

    flow.as_new_flow().unwrap();

    assert_eq!(flow.close_reason(), Some("following redirect"));
    assert_eq!(
        flow.close_reasons(),
        "client sent Connection: close, server sent Connection: close, following redirect"
    );
}

#[test]
fn unsupported_scheme_ends_exchange() {
    let mut flow = to_redirect("https://b.test/");

    assert!(matches!(flow.redirect(), Redirect::UnsupportedScheme { .. }));
    assert!(flow.as_new_flow().is_none());

    let flow = flow.proceed();
    assert_eq!(flow.response().status(), 302);
    assert_eq!(flow.close_reason(), Some("client sent Connection: close"));
}

#[test]
fn invalid_location_ends_exchange() {
    let mut flow = to_redirect("http://b.test:99999/");

    assert!(matches!(flow.redirect(), Redirect::Invalid { .. }));
    assert!(flow.as_new_flow().is_none());

    let exchange = flow.proceed().into_exchange();
    assert_eq!(exchange.target.host(), "q.test");
    assert_eq!(exchange.redirects, 0);
}

#[test]
fn new_flow_starts_fresh() {
    let mut flow = to_redirect("http://b.test/");

    let next = flow.as_new_flow().unwrap();
    let inner = next.inner();

    assert!(inner.head.is_empty());
    assert!(inner.response.is_none());
    assert_eq!(inner.close_reason.len(), 1);
}
