use gogen::code::{ident, scoped, Code};
use gogen::router::{config, Config, Route, StatusCode};
use pretty_assertions::assert_eq;

#[test]
fn receiver_is_derived_from_the_type_name() {
    assert_eq!(Config::new("p", "Mux").receiver, "m");
    assert_eq!(Config::new("p", "ex").receiver, "e");
    assert_eq!(Config::new("p", "Router").receiver, "rr");

    let default = Config::new("p", "");
    assert_eq!(default.type_name, "Router");
    assert_eq!((default.writer.as_str(), default.request.as_str()), ("w", "r"));
}

#[test]
fn generates_serve_http() {
    let out = Config::new("example", "ex")
        .generate(&[&StatusCode(200)])
        .render()
        .unwrap();
    assert_eq!(
        out,
        "package example

import \"net/http\"

func (e ex) ServeHTTP(w http.ResponseWriter, r *http.Request) {
\tw.WriteHeader(200)
}
"
    );
}

struct Redirect(&'static str);

impl Route for Redirect {
    fn route(&self) -> Code {
        let target = self.0;
        scoped(move |s| {
            let c = config(s);
            ident("http").dot("Redirect").call(&[
                ident(&c.writer),
                ident(&c.request),
                gogen::code::string(target),
                ident("http").dot("StatusFound"),
            ])
        })
    }
}

#[test]
fn routes_see_the_configured_names() {
    let mut cfg = Config::new("web", "Site");
    cfg.writer = "rw".to_owned();
    cfg.request = "req".to_owned();

    let code = cfg.generate(&[&Redirect("/home"), &StatusCode(302)]);
    assert!(gogen::round_trip(&code).unwrap());
    assert_eq!(
        code.render().unwrap(),
        "package web

import \"net/http\"

func (s Site) ServeHTTP(rw http.ResponseWriter, req *http.Request) {
\thttp.Redirect(rw, req, \"/home\", http.StatusFound)
\trw.WriteHeader(302)
}
"
    );
}

#[test]
#[should_panic(expected = "outside of a generated router")]
fn routes_need_a_router() {
    StatusCode(404).route().build();
}
