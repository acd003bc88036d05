use actix_cors::Cors;

// Any origin, any method, any request header; preflights are cached for an hour.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::{
        ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
        ACCESS_CONTROL_REQUEST_HEADERS, ACCESS_CONTROL_REQUEST_METHOD, ORIGIN,
    };
    use actix_web::http::{Method, StatusCode};
    use actix_web::{test, web, App};

    #[actix_web::test]
    async fn allows_any_origin() {
        let app = test::init_service(
            App::new()
                .wrap(cors())
                .route("/", web::get().to(|| async { "ok" })),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((ORIGIN, "http://localhost:5173"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
    }

    #[actix_web::test]
    async fn answers_preflight_for_patch() {
        let app = test::init_service(
            App::new()
                .wrap(cors())
                .route("/products/{id}", web::patch().to(|| async { "ok" })),
        )
        .await;

        let req = test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/products/1")
            .insert_header((ORIGIN, "http://localhost:5173"))
            .insert_header((ACCESS_CONTROL_REQUEST_METHOD, "PATCH"))
            .insert_header((ACCESS_CONTROL_REQUEST_HEADERS, "content-type"))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert!(res.status().is_success());
        assert_eq!(res.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
        let methods = res.headers().get(ACCESS_CONTROL_ALLOW_METHODS).unwrap();
        assert!(methods.to_str().unwrap().contains("PATCH"));
    }
}
