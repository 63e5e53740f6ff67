use mongodb::{bson::doc, options::IndexOptions, Database, IndexModel};

pub async fn ensure_indexes(db: &Database) -> Result<(), String> {
    // favorites / monitors: at most one link per (user, fund); the unique
    // index is the uniqueness enforcement, inserts map E11000 to "already
    // exists"
    for name in ["favorites", "monitors"] {
        let col = db.collection::<mongodb::bson::Document>(name);

        let model = IndexModel::builder()
            .keys(doc! { "user_id": 1, "fund_code": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        col.create_index(model, None)
            .await
            .map_err(|e| e.to_string())?;

        // list by user sorted by recency
        let model = IndexModel::builder()
            .keys(doc! { "user_id": 1, "created_at": -1 })
            .build();

        col.create_index(model, None)
            .await
            .map_err(|e| e.to_string())?;
    }

    // rules: one rule per (user, fund) for id-less saves (upsert target)
    {
        let col = db.collection::<mongodb::bson::Document>("rules");

        let model = IndexModel::builder()
            .keys(doc! { "user_id": 1, "fund_code": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        col.create_index(model, None)
            .await
            .map_err(|e| e.to_string())?;

        // scheduler scan by delivery time
        let model = IndexModel::builder()
            .keys(doc! { "push_time": 1 })
            .build();

        let _ = col.create_index(model, None).await;
    }

    Ok(())
}
