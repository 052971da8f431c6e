//! Postgres document store test. Runs only when `DATABASE_URL` is set;
//! otherwise it returns early.

use animal_shelter::domain::model::{
    AnimalInput, AnimalType, CheckupInput, CollectionRecord, ObjectId, Vet,
};
use animal_shelter::storage::document::{document_id, to_document, Document};
use animal_shelter::{AnimalRepository, DocumentStore, PostgresDocumentStore};
use chrono::NaiveDate;
use serde_json::json;
use std::sync::Arc;

fn doc(value: serde_json::Value) -> Document {
    match value {
        serde_json::Value::Object(map) => map,
        _ => panic!("not an object"),
    }
}

async fn connect() -> Result<Option<PostgresDocumentStore>, Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let Ok(url) = std::env::var("DATABASE_URL") else {
        println!("DATABASE_URL not set; skipping Postgres store test");
        return Ok(None);
    };
    let store = PostgresDocumentStore::connect(&url, 2).await?;
    store.ensure_schema().await?;
    Ok(Some(store))
}

#[tokio::test]
async fn test_nested_array_operations() -> Result<(), Box<dyn std::error::Error>> {
    let Some(store) = connect().await? else {
        return Ok(());
    };
    // A fresh collection name keeps repeated runs independent.
    let collection = format!("test_owners_{}", ObjectId::new());

    let owner = store.insert(&collection, doc(json!({ "name": "owner", "items": [] }))).await?;
    let first = ObjectId::new();
    let second = ObjectId::new();
    for (id, n) in [(first, 1), (second, 2)] {
        assert!(
            store
                .push_element(&collection, &owner, "items", doc(json!({ "_id": id.to_hex(), "n": n })))
                .await?
        );
    }

    let found = store.find_by_element(&collection, "items", &second).await?;
    assert_eq!(found.as_ref().and_then(document_id), Some(owner));

    let updated = store
        .set_element_fields(&collection, "items", &second, doc(json!({ "n": 20 })))
        .await?;
    assert_eq!(updated, Some(owner));

    let body = store.find_by_id(&collection, &owner).await?.unwrap_or_default();
    assert_eq!(body["items"][0]["n"], 1);
    assert_eq!(body["items"][1]["n"], 20);
    assert_eq!(body["items"][1]["_id"], second.to_hex().as_str());

    assert_eq!(store.pull_element(&collection, "items", &first).await?, Some(owner));
    assert_eq!(store.pull_element(&collection, "items", &first).await?, None);
    let body = store.find_by_id(&collection, &owner).await?.unwrap_or_default();
    assert_eq!(body["items"].as_array().map(|a| a.len()), Some(1));

    assert!(store.delete(&collection, &owner).await?);
    assert!(!store.delete(&collection, &owner).await?);
    assert_eq!(store.count(&collection).await?, 0);

    store.close().await;
    Ok(())
}

#[tokio::test]
async fn test_repository_over_postgres() -> Result<(), Box<dyn std::error::Error>> {
    let Some(store) = connect().await? else {
        return Ok(());
    };

    let animal_type = AnimalType {
        id: ObjectId::new(),
        name: "Rabbit".to_string(),
    };
    let vet = Vet {
        id: ObjectId::new(),
        name: "Dr Lim".to_string(),
        address: None,
        license_number: None,
    };
    store
        .insert(AnimalType::COLLECTION, to_document(AnimalType::COLLECTION, &animal_type)?)
        .await?;
    store
        .insert(Vet::COLLECTION, to_document(Vet::COLLECTION, &vet)?)
        .await?;

    let repo = AnimalRepository::new(Arc::new(store.clone()));
    let animal_id = repo
        .create_animal(&AnimalInput {
            name: "Thumper".to_string(),
            breed: "Lionhead".to_string(),
            age: "2".to_string(),
            type_id: animal_type.id,
        })
        .await?;
    let checkup_id = repo
        .add_checkup(
            &animal_id,
            &CheckupInput {
                diagnosis: "Overgrown teeth".to_string(),
                treatment: "Trim".to_string(),
                date: NaiveDate::from_ymd_opt(2021, 3, 4).unwrap_or_default(),
                vet_id: vet.id,
            },
        )
        .await?;

    let record = repo.get_checkup(&checkup_id).await?;
    assert_eq!(record.animal_id, animal_id);
    assert_eq!(record.animal_name, "Thumper");
    assert_eq!(record.checkup.vet_name, "Dr Lim");

    assert_eq!(repo.delete_checkup(&checkup_id).await?, Some(animal_id));
    assert_eq!(repo.delete_checkup(&checkup_id).await?, None);
    assert!(repo.delete_animal(&animal_id).await?);
    assert!(repo.get_animal(&animal_id).await.unwrap_err().is_not_found());

    store.delete(AnimalType::COLLECTION, &animal_type.id).await?;
    store.delete(Vet::COLLECTION, &vet.id).await?;
    store.close().await;
    Ok(())
}
