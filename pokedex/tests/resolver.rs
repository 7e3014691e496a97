use bson::oid::ObjectId;
use pokedex::{memory::InMemoryStore, prelude::*, pokemon::COLLECTION};
use pretty_assertions::assert_eq;
use rstest::rstest;

async fn resolver() -> PokemonResolver<InMemoryStore> {
    let store = DocumentStore::new(InMemoryStore::builder().build().await.unwrap());
    let resolver = PokemonResolver::new(store, ResolverConfig::default());
    resolver.ensure_indexes().await.unwrap();
    resolver
}

async fn seeded(names: &[(&str, i64)]) -> PokemonResolver<InMemoryStore> {
    let resolver = resolver().await;
    for (name, no) in names {
        resolver.create(CreatePokemon::new(*name, *no)).await.unwrap();
    }
    resolver
}

const KANTO: [(&str, i64); 5] = [
    ("squirtle", 7),
    ("bulbasaur", 1),
    ("charmander", 4),
    ("ivysaur", 2),
    ("venusaur", 3),
];

#[tokio::test]
async fn created_record_is_found_by_no_and_by_name() {
    let resolver = resolver().await;

    let created = resolver
        .create(CreatePokemon::new("PiKaChU", 25).with_field("type", "electric"))
        .await
        .unwrap();

    assert_eq!(created.name, "pikachu");
    assert_eq!(created.version, Some(0));
    assert_eq!(resolver.find_one("25").await.unwrap(), created);
    assert_eq!(resolver.find_one("pikachu").await.unwrap(), created);
    assert_eq!(resolver.find_one(&created.id.to_hex()).await.unwrap(), created);
}

#[tokio::test]
async fn name_lookup_is_case_sensitive() {
    let resolver = seeded(&[("pikachu", 25)]).await;

    let err = resolver.find_one("Pikachu").await.unwrap_err();

    assert_eq!(err, ResolverError::NotFound { term: "Pikachu".to_string() });
}

#[rstest]
#[case::same_no(CreatePokemon::new("raichu", 25))]
#[case::same_name_other_case(CreatePokemon::new("PIKACHU", 172))]
#[tokio::test]
async fn second_create_with_taken_key_is_duplicate(#[case] second: CreatePokemon) {
    let resolver = seeded(&[("pikachu", 25)]).await;

    let err = resolver.create(second).await.unwrap_err();

    assert!(matches!(err, ResolverError::DuplicateEntry { .. }));
    assert_eq!(err.class(), ErrorClass::BadRequest);
    assert_eq!(resolver.store().backend().count(COLLECTION).await, 1);
}

#[tokio::test]
async fn numeric_term_prefers_no_over_name() {
    let resolver = resolver().await;
    let by_name = resolver.create(CreatePokemon::new("25", 999)).await.unwrap();
    let by_no = resolver.create(CreatePokemon::new("pikachu", 25)).await.unwrap();

    assert_eq!(resolver.find_one("25").await.unwrap().id, by_no.id);
    assert_ne!(by_name.id, by_no.id);
}

#[tokio::test]
async fn numeric_term_falls_back_to_name() {
    let resolver = seeded(&[("1e3", 5)]).await;

    assert_eq!(resolver.find_one("1e3").await.unwrap().no, 5);
}

#[tokio::test]
async fn all_digit_identifier_is_tried_as_no_then_as_id() {
    let resolver = resolver().await;
    let created = resolver.create(CreatePokemon::new("mew", 151)).await.unwrap();

    // Not a stored ordinal, so resolution moves on to the identifier tier and then to name
    let err = resolver.find_one("123456789012345678901234").await.unwrap_err();
    assert!(matches!(err, ResolverError::NotFound { .. }));

    assert_eq!(resolver.find_one(&created.id.to_hex()).await.unwrap().name, "mew");
}

#[tokio::test]
async fn missing_term_is_not_found_and_named() {
    let resolver = resolver().await;

    let err = resolver.find_one("999999").await.unwrap_err();

    assert!(err.to_string().contains("999999"));
    assert_eq!(err.class().status_code(), 404);
}

#[tokio::test]
async fn find_all_pages_by_ascending_no_without_revision() {
    let resolver = seeded(&KANTO[1..]).await;
    resolver.create(CreatePokemon::new("charmeleon", 5)).await.unwrap();

    let page = resolver
        .find_all(PaginationParams::builder().with_limit(2).with_offset(0).build())
        .await
        .unwrap();

    assert_eq!(page.iter().map(|p| p.no).collect::<Vec<_>>(), vec![1, 2]);
    assert!(page.iter().all(|p| p.version.is_none()));
    assert!(page.iter().all(|p| !p.to_document().unwrap().contains_key("__v")));
}

#[rstest]
#[case(PaginationParams::default(), vec![1, 2, 3, 4, 7])]
#[case(PaginationParams::builder().with_offset(3).build(), vec![4, 7])]
#[case(PaginationParams::builder().with_limit(1).with_offset(1).build(), vec![2])]
#[case(PaginationParams::builder().with_offset(10).build(), vec![])]
#[case(PaginationParams::builder().with_limit(0).build(), vec![])]
#[tokio::test]
async fn find_all_applies_defaults_and_offsets(#[case] params: PaginationParams, #[case] expected: Vec<i64>) {
    let resolver = seeded(&KANTO).await;

    let page = resolver.find_all(params).await.unwrap();

    assert_eq!(page.into_iter().map(|p| p.no).collect::<Vec<_>>(), expected);
}

#[tokio::test]
async fn find_all_caps_at_configured_default_limit() {
    let store = DocumentStore::new(InMemoryStore::new());
    let resolver = PokemonResolver::new(store, ResolverConfig::new(3));
    for (name, no) in KANTO {
        resolver.create(CreatePokemon::new(name, no)).await.unwrap();
    }

    let page = resolver.find_all(PaginationParams::default()).await.unwrap();

    assert_eq!(page.len(), 3);
}

#[tokio::test]
async fn update_lowercases_and_persists_name() {
    let resolver = seeded(&[("pichu", 25)]).await;

    let updated = resolver
        .update("25", UpdatePokemon::new().with_name("PIKACHU"))
        .await
        .unwrap();

    assert_eq!(updated.name, "pikachu");
    assert_eq!(resolver.find_one("pikachu").await.unwrap().id, updated.id);
    assert!(resolver.find_one("pichu").await.is_err());
}

#[tokio::test]
async fn update_keeps_fields_it_does_not_mention() {
    let resolver = resolver().await;
    let created = resolver
        .create(CreatePokemon::new("eevee", 133).with_field("type", "normal"))
        .await
        .unwrap();

    let updated = resolver
        .update("eevee", UpdatePokemon::new().with_no(134).with_field("_id", "forged"))
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.no, 134);
    assert_eq!(updated.extra.get_str("type").unwrap(), "normal");

    let stored = resolver.find_one("134").await.unwrap();
    assert_eq!(stored.id, created.id);
    assert_eq!(stored.extra.get_str("type").unwrap(), "normal");
}

#[rstest]
#[case::taken_name(UpdatePokemon::new().with_name("Pikachu"))]
#[case::taken_no(UpdatePokemon::new().with_no(25))]
#[tokio::test]
async fn update_into_taken_key_is_duplicate(#[case] patch: UpdatePokemon) {
    let resolver = seeded(&[("pikachu", 25), ("raichu", 26)]).await;

    let err = resolver.update("raichu", patch).await.unwrap_err();

    assert!(matches!(err, ResolverError::DuplicateEntry { .. }));
    let raichu = resolver.find_one("26").await.unwrap();
    assert_eq!((raichu.name.as_str(), raichu.no), ("raichu", 26));
}

#[tokio::test]
async fn extra_fields_cannot_override_name_or_no() {
    let resolver = seeded(&[("pichu", 172)]).await;

    let created = resolver
        .create(CreatePokemon::new("Mew", 151).with_field("name", "MEW"))
        .await
        .unwrap();
    assert_eq!(created.name, "mew");

    resolver
        .update("172", UpdatePokemon::new().with_field("name", "RAICHU"))
        .await
        .unwrap();
    assert_eq!(resolver.find_one("172").await.unwrap().name, "pichu");

    let updated = resolver
        .update("pichu", UpdatePokemon::new().with_field("no", "abc"))
        .await
        .unwrap();
    assert_eq!(updated.no, 172);

    let listed = resolver.find_all(PaginationParams::default()).await.unwrap();
    assert_eq!(listed.iter().map(|p| p.no).collect::<Vec<_>>(), vec![151, 172]);
}

#[tokio::test]
async fn update_of_unknown_term_propagates_not_found() {
    let resolver = resolver().await;

    let err = resolver
        .update("missingno", UpdatePokemon::new().with_no(0))
        .await
        .unwrap_err();

    assert_eq!(err, ResolverError::NotFound { term: "missingno".to_string() });
}

#[tokio::test]
async fn remove_deletes_exactly_once() {
    let resolver = seeded(&[("bulbasaur", 1), ("ivysaur", 2)]).await;
    let target = resolver.find_one("bulbasaur").await.unwrap();

    resolver.remove(&target.id).await.unwrap();

    assert_eq!(resolver.store().backend().count(COLLECTION).await, 1);
    assert!(matches!(
        resolver.find_one(&target.id.to_hex()).await,
        Err(ResolverError::NotFound { .. })
    ));

    let again = resolver.remove(&target.id).await.unwrap_err();
    assert!(again.to_string().contains(&target.id.to_hex()));
}

#[tokio::test]
async fn remove_of_unknown_id_is_not_found() {
    let resolver = seeded(&[("bulbasaur", 1)]).await;

    let err = resolver.remove(&ObjectId::new()).await.unwrap_err();

    assert_eq!(err.class(), ErrorClass::NotFound);
    assert_eq!(resolver.store().backend().count(COLLECTION).await, 1);
}

#[tokio::test]
async fn handler_style_remove_validates_identifier_first() {
    let resolver = seeded(&[("bulbasaur", 1)]).await;

    let err = parse_store_id("bulbasaur").unwrap_err();
    assert_eq!(err.class().status_code(), 400);

    let created = resolver.find_one("1").await.unwrap();
    let id = parse_store_id(&created.id.to_hex()).unwrap();
    resolver.remove(&id).await.unwrap();
}

#[tokio::test]
async fn records_render_as_json() {
    let resolver = resolver().await;
    let created = resolver.create(CreatePokemon::new("Snorlax", 143)).await.unwrap();

    let json = created.to_json().unwrap();

    assert_eq!(json["name"], "snorlax");
    assert_eq!(json["no"], 143);
}
