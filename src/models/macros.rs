// Pulls a clone of a shared value out of serenity's TypeMap.
#[macro_export]
macro_rules! shared {
    ($ctx: expr, $key: ty) => {
        {
            let ctx_global = $ctx.data.read().await;
            let out = ctx_global.get::<$key>().expect(concat!("Couldn't find ", stringify!($key))).clone();

            out
        }
    }
}

#[macro_export]
macro_rules! db {
    ($ctx: expr) => {
        {
            $crate::shared!($ctx, $crate::services::database::Database)
        }
    }
}

#[macro_export]
macro_rules! botdb {
    ($ctx: expr) => {
        {
            $crate::db!($ctx.serenity_context())
        }
    }
}

#[macro_export]
macro_rules! scoresaber {
    ($ctx: expr) => {
        {
            $crate::shared!($ctx.serenity_context(), $crate::services::scoresaber::ScoreSaber)
        }
    }
}

#[macro_export]
macro_rules! beatsaver {
    ($ctx: expr) => {
        {
            $crate::shared!($ctx.serenity_context(), $crate::services::beatsaver::BeatSaver)
        }
    }
}

#[macro_export]
macro_rules! botconfig {
    ($ctx: expr) => {
        {
            $crate::shared!($ctx.serenity_context(), $crate::models::config::Config)
        }
    }
}

#[macro_export]
macro_rules! quickchart {
    ($ctx: expr) => {
        {
            $crate::shared!($ctx.serenity_context(), $crate::services::charts::QuickChart)
        }
    }
}
