use super::*;

#[test]
fn chunk_points_get_unique_ids() {
    let a = ChunkPoint::new(vec![0.0; 4], "one".to_string(), "a.md".to_string());
    let b = ChunkPoint::new(vec![0.0; 4], "two".to_string(), "a.md".to_string());

    assert_ne!(a.id, b.id);
}

#[test]
fn point_struct_carries_text_and_path_payload() {
    let point = ChunkPoint::new(
        vec![0.1, 0.2, 0.3],
        "chunk body".to_string(),
        "docs/readme.md".to_string(),
    );
    let id = point.id;

    let stored = to_point_struct(point);

    assert_eq!(
        stored
            .payload
            .get("text")
            .and_then(|v| v.as_str())
            .map(String::as_str),
        Some("chunk body")
    );
    assert_eq!(
        stored
            .payload
            .get("file_path")
            .and_then(|v| v.as_str())
            .map(String::as_str),
        Some("docs/readme.md")
    );

    // The point id is the chunk's UUID in string form.
    let expected = qdrant_client::qdrant::PointId::from(id.to_string());
    assert_eq!(stored.id, Some(expected));
}

#[test]
fn query_hit_text_is_optional() {
    let hit = QueryHit {
        score: 0.9,
        text: None,
    };

    assert!(hit.text.is_none());
}
