//! SeaORM entities for database tables

use crate::contract::{NamedEntity, Speaker, Sponsor};
use sea_orm::sea_query::DeleteStatement;
use sea_orm::{ActiveModelBehavior, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryTrait};

/// Events table entity
pub mod event {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "events")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
        pub description: String,
        pub plan: String,
        /// Naive local date-time, stored as given
        pub date: DateTime,
        pub location: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::event_sponsor::Entity")]
        EventSponsors,
        #[sea_orm(has_many = "super::event_speaker::Entity")]
        EventSpeakers,
    }

    impl Related<super::event_sponsor::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::EventSponsors.def()
        }
    }

    impl Related<super::event_speaker::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::EventSpeakers.def()
        }
    }

    impl Related<super::sponsor::Entity> for Entity {
        fn to() -> RelationDef {
            super::event_sponsor::Relation::Sponsor.def()
        }

        fn via() -> Option<RelationDef> {
            Some(super::event_sponsor::Relation::Event.def().rev())
        }
    }

    impl Related<super::speaker::Entity> for Entity {
        fn to() -> RelationDef {
            super::event_speaker::Relation::Speaker.def()
        }

        fn via() -> Option<RelationDef> {
            Some(super::event_speaker::Relation::Event.def().rev())
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Speakers table entity
pub mod speaker {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "speakers")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::event_speaker::Entity")]
        EventSpeakers,
    }

    impl Related<super::event_speaker::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::EventSpeakers.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Sponsors table entity
pub mod sponsor {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "sponsors")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::event_sponsor::Entity")]
        EventSponsors,
    }

    impl Related<super::event_sponsor::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::EventSponsors.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Event <-> Sponsor junction table
pub mod event_sponsor {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "event_sponsors")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub event_id: i32,
        #[sea_orm(primary_key, auto_increment = false)]
        pub sponsor_id: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::event::Entity",
            from = "Column::EventId",
            to = "super::event::Column::Id",
            on_delete = "Cascade"
        )]
        Event,
        #[sea_orm(
            belongs_to = "super::sponsor::Entity",
            from = "Column::SponsorId",
            to = "super::sponsor::Column::Id",
            on_delete = "Cascade"
        )]
        Sponsor,
    }

    impl Related<super::event::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Event.def()
        }
    }

    impl Related<super::sponsor::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Sponsor.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Event <-> Speaker junction table
pub mod event_speaker {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "event_speakers")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub event_id: i32,
        #[sea_orm(primary_key, auto_increment = false)]
        pub speaker_id: i32,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::event::Entity",
            from = "Column::EventId",
            to = "super::event::Column::Id",
            on_delete = "Cascade"
        )]
        Event,
        #[sea_orm(
            belongs_to = "super::speaker::Entity",
            from = "Column::SpeakerId",
            to = "super::speaker::Column::Id",
            on_delete = "Cascade"
        )]
        Speaker,
    }

    impl Related<super::event::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Event.def()
        }
    }

    impl Related<super::speaker::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Speaker.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Entity with an integer identity and a single name column
pub trait NamedTable: EntityTrait {
    type Record: NamedEntity;
    type Active: ActiveModelTrait<Entity = Self> + ActiveModelBehavior + Send + Sync;

    fn id_column() -> Self::Column;

    fn name_column() -> Self::Column;

    fn to_record(model: Self::Model) -> Self::Record;

    /// Insertable row; the identity is left to the store
    fn to_active(record: &Self::Record) -> Self::Active;

    /// Removes the record's event memberships
    fn unlink_events(id: i32) -> DeleteStatement;
}

impl NamedTable for speaker::Entity {
    type Record = Speaker;
    type Active = speaker::ActiveModel;

    fn id_column() -> Self::Column {
        speaker::Column::Id
    }

    fn name_column() -> Self::Column {
        speaker::Column::Name
    }

    fn to_record(model: speaker::Model) -> Speaker {
        model.into()
    }

    fn to_active(record: &Speaker) -> speaker::ActiveModel {
        record.into()
    }

    fn unlink_events(id: i32) -> DeleteStatement {
        event_speaker::Entity::delete_many()
            .filter(event_speaker::Column::SpeakerId.eq(id))
            .into_query()
    }
}

impl NamedTable for sponsor::Entity {
    type Record = Sponsor;
    type Active = sponsor::ActiveModel;

    fn id_column() -> Self::Column {
        sponsor::Column::Id
    }

    fn name_column() -> Self::Column {
        sponsor::Column::Name
    }

    fn to_record(model: sponsor::Model) -> Sponsor {
        model.into()
    }

    fn to_active(record: &Sponsor) -> sponsor::ActiveModel {
        record.into()
    }

    fn unlink_events(id: i32) -> DeleteStatement {
        event_sponsor::Entity::delete_many()
            .filter(event_sponsor::Column::SponsorId.eq(id))
            .into_query()
    }
}
