/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
mod helpers;

#[cfg(test)]
mod test {
    use crate::helpers::{MockTransport, fields, shared};
    use openphoto::{
        Kind, KindSpec, Method, OpenPhotoError, Related, Relationship, RequestOptions, Resource,
    };
    use serde_json::json;

    static BASE: KindSpec = KindSpec {
        name: "Base",
        collection_path: Some("/collection"),
        object_path: "/object",
        create_path: Some("/create_path"),
        relationships: &[],
    };

    static NESTED: KindSpec = KindSpec {
        name: "Nested",
        collection_path: None,
        object_path: "/nested",
        create_path: None,
        relationships: &[
            Relationship::many("items", Kind::Photo),
            Relationship::single("owner", Kind::Album),
        ],
    };

    #[test]
    fn reads_fields_through_the_codec() {
        let mock = MockTransport::new();
        let obj = Resource::new(shared(&mock), &BASE, fields(json!({"attr1": 1, "targetUrl": "x"}))).unwrap();

        assert_eq!(obj.field("attr1").unwrap(), &json!(1));
        assert_eq!(obj.field("target_url").unwrap(), &json!("x"));

        let err = obj.field("no_existing").unwrap_err();
        assert!(err.is_attribute_not_found());
    }

    #[test]
    fn writes_fields_through_the_codec() {
        let mock = MockTransport::new();
        let mut obj = Resource::new(shared(&mock), &BASE, fields(json!({}))).unwrap();
        obj.set_field("new_attr", 1);

        assert!(!obj.fields().contains_key("new_attr"));
        assert_eq!(obj.fields()["newAttr"], json!(1));
        assert_eq!(obj.field("new_attr").unwrap(), &json!(1));
        assert_eq!(obj.field("newAttr").unwrap(), &json!(1));

        // Fixed members are plain fields too
        obj.set_field("id", "renamed");
        assert_eq!(obj.id().as_deref(), Some("renamed"));
    }

    #[tokio::test]
    async fn get_views_by_id() {
        let mock = MockTransport::new();
        mock.push_result(json!({"id": "id", "res1": 1}));

        let obj = Resource::get(shared(&mock), &BASE, "id").await.unwrap();
        assert_eq!(obj.fields(), &fields(json!({"id": "id", "res1": 1})));

        let reqs = mock.requests();
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].method, Method::Get);
        assert_eq!(reqs[0].path, "/object/id/view.json");
        assert_eq!(reqs[0].param("includeElements"), Some("1"));
    }

    #[tokio::test]
    async fn get_fails_without_envelope() {
        let mock = MockTransport::new();
        mock.push_json(json!({"code": 200, "message": "ok"}));

        let err = Resource::get(shared(&mock), &BASE, "id").await.unwrap_err();
        assert!(matches!(err, OpenPhotoError::ResponseMissing()));
    }

    #[tokio::test]
    async fn remote_failures_propagate() {
        let mock = MockTransport::new();
        mock.push_error(OpenPhotoError::Http {
            status: 404,
            message: "gone".into(),
        });

        let err = Resource::get(shared(&mock), &BASE, "id").await.unwrap_err();
        assert!(matches!(err, OpenPhotoError::Http { status: 404, .. }));
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn create_merges_data_override() {
        let mock = MockTransport::new();
        mock.push_result(json!({"res1": 1, "res2": 2}));

        let request = RequestOptions::with_data(fields(json!({"attr2": "override", "attr3": 3})));
        let obj = Resource::create(
            shared(&mock),
            &BASE,
            None,
            request,
            fields(json!({"attr1": 1, "attr2": 2})),
        )
        .await
        .unwrap();
        assert_eq!(obj.fields(), &fields(json!({"res1": 1, "res2": 2})));

        let reqs = mock.requests();
        assert_eq!(reqs[0].method, Method::Post);
        assert_eq!(reqs[0].path, "/create_path");
        assert_eq!(reqs[0].data(), fields(json!({"attr1": 1, "attr2": "override", "attr3": 3})));
    }

    #[tokio::test]
    async fn create_needs_a_path() {
        let mock = MockTransport::new();
        let err = Resource::create(shared(&mock), &NESTED, None, RequestOptions::default(), fields(json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, OpenPhotoError::InvalidArgument(_)));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn update_posts_all_fields_and_returns_raw_body() {
        let mock = MockTransport::new();
        let body = json!({"code": 200, "message": "updated", "result": {"param1": 9}});
        mock.push_json(body.clone());

        let mut obj = Resource::new(shared(&mock), &BASE, fields(json!({"id": 1, "param1": 1, "param2": 2}))).unwrap();
        obj.fields_mut().remove("param2");
        obj.set_field("param3", 3);

        let res = obj.update().await.unwrap();
        assert_eq!(res, body);
        // Fields are not replaced by the response
        assert_eq!(obj.field("param1").unwrap(), &json!(1));

        let reqs = mock.requests();
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].method, Method::Post);
        assert_eq!(reqs[0].path, "/object/1/update.json");
        assert_eq!(reqs[0].data(), fields(json!({"id": 1, "param1": 1, "param3": 3})));
    }

    #[tokio::test]
    async fn delete_posts_once_and_returns_raw_body() {
        let mock = MockTransport::new();
        let body = json!({"code": 204, "message": "deleted", "result": true});
        mock.push_json(body.clone());

        let obj = Resource::new(shared(&mock), &BASE, fields(json!({"id": "a"}))).unwrap();
        assert_eq!(obj.delete().await.unwrap(), body);

        let reqs = mock.requests();
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].method, Method::Post);
        assert_eq!(reqs[0].path, "/object/a/delete.json");
    }

    #[test]
    fn builds_object_urls() {
        let mock = MockTransport::new();
        let obj = Resource::new(shared(&mock), &BASE, fields(json!({"id": 1}))).unwrap();

        assert_eq!(obj.url(&["test"]).unwrap(), "/object/1/test.json");
        assert_eq!(
            obj.url(&["test", "multiple", "action"]).unwrap(),
            "/object/1/test/multiple/action.json"
        );
        assert_eq!(
            obj.url_with_extension(&["test", "no", "ext"], None).unwrap(),
            "/object/1/test/no/ext"
        );
        assert_eq!(
            obj.url_with_options(&["test", "no", "ext"], &fields(json!({"extension": null})))
                .unwrap(),
            "/object/1/test/no/ext"
        );

        let err = obj
            .url_with_options(&["test"], &fields(json!({"wrong": "arg"})))
            .unwrap_err();
        assert!(matches!(err, OpenPhotoError::InvalidArgument(ref m) if m.contains("'wrong'")));
    }

    #[tokio::test]
    async fn ids_are_escaped_as_one_segment() {
        let mock = MockTransport::new();
        mock.push_result(json!({"id": "c#/x?y"}));

        let obj = Resource::get(shared(&mock), &BASE, "c#/x?y").await.unwrap();
        assert_eq!(mock.requests()[0].path, "/object/c%23%2Fx%3Fy/view.json");
        assert_eq!(obj.url(&["update"]).unwrap(), "/object/c%23%2Fx%3Fy/update.json");
        assert_eq!(obj.id().as_deref(), Some("c#/x?y"));
    }

    #[test]
    fn url_needs_an_id() {
        let mock = MockTransport::new();
        let obj = Resource::new(shared(&mock), &BASE, fields(json!({}))).unwrap();
        assert!(obj.url(&["view"]).unwrap_err().is_attribute_not_found());
    }

    #[test]
    fn displays_kind_and_id() {
        let mock = MockTransport::new();
        let obj = Resource::new(shared(&mock), &BASE, fields(json!({"id": 1}))).unwrap();
        assert_eq!(obj.to_string(), "<Base 1>");
    }

    #[test]
    fn absent_relationships_resolve_empty() {
        let mock = MockTransport::new();
        let obj = Resource::new(shared(&mock), &NESTED, fields(json!({"id": "n", "items": []}))).unwrap();

        assert!(obj.related_many("items").is_empty());
        assert!(obj.related_one("owner").is_none());
        assert_eq!(obj.related("owner"), Some(&Related::Single(None)));
        // Undeclared names resolve to nothing
        assert!(obj.related("other").is_none());
    }

    #[test]
    fn nested_resources_resolve_recursively() {
        let mock = MockTransport::new();
        let obj = Resource::new(
            shared(&mock),
            &NESTED,
            fields(json!({
                "id": "n",
                "items": [{"id": "p1"}, {"id": "p2"}],
                "owner": {"id": "a1", "cover": {"id": "c"}},
            })),
        )
        .unwrap();

        let items = obj.related_many("items");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].spec().name, "Photo");
        assert_eq!(items[1].id().as_deref(), Some("p2"));

        let owner = obj.related_one("owner").unwrap();
        assert_eq!(owner.spec().name, "Album");
        assert_eq!(owner.related_one("cover").unwrap().id().as_deref(), Some("c"));

        // The raw data stays as it was
        assert_eq!(obj.fields()["owner"], json!({"id": "a1", "cover": {"id": "c"}}));
    }

    #[test]
    fn mistyped_nested_data_is_malformed() {
        let mock = MockTransport::new();
        let err = Resource::new(shared(&mock), &NESTED, fields(json!({"owner": "a1"}))).unwrap_err();
        assert!(matches!(err, OpenPhotoError::ApiResponseMalformed(_)));
    }

    #[tokio::test]
    async fn refresh_replaces_fields_and_reresolves() {
        let mock = MockTransport::new();
        let mut obj = Resource::new(shared(&mock), &NESTED, fields(json!({"id": "n", "stale": true}))).unwrap();
        assert!(obj.related_many("items").is_empty());

        let fresh = json!({"id": "n", "items": [{"id": "p1"}], "owner": {"id": "a"}});
        mock.push_result(fresh.clone());
        mock.push_result(fresh.clone());

        obj.refresh().await.unwrap();
        let first = obj.fields().clone();
        assert!(!first.contains_key("stale"));
        assert_eq!(obj.related_many("items").len(), 1);
        assert!(obj.related_one("owner").is_some());

        obj.view().await.unwrap();
        assert_eq!(obj.fields(), &first);

        let reqs = mock.requests();
        assert_eq!(reqs.len(), 2);
        assert!(reqs.iter().all(|r| r.path == "/nested/n/view.json"));
    }

    #[tokio::test]
    async fn writes_do_not_touch_resolved_relationships() {
        let mock = MockTransport::new();
        let mut obj = Resource::new(shared(&mock), &NESTED, fields(json!({"id": "n", "owner": {"id": "a"}}))).unwrap();

        obj.set_field("owner", json!({"id": "b"}));
        assert_eq!(obj.related_one("owner").unwrap().id().as_deref(), Some("a"));
        assert_eq!(obj.fields()["owner"], json!({"id": "b"}));
    }
}
