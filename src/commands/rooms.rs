use crate::commands::{
    create_error_embed, create_success_embed, split_message, CommandResult, Context,
    DISCORD_MESSAGE_LIMIT,
};
use crate::components::room_finder::models::WeekdayTag;
use crate::components::room_finder::request::{render_reply, FindRoomArgsError, FindRoomRequest};
use crate::components::room_finder::RoomFinder;
use crate::components::RoomFinderHandle;
use crate::error::{component_error, BotResult};
use crate::utils::time::{current_day_and_time, parse_timezone};
use rust_i18n::t;
use tracing::debug;

/// Find empty rooms. Add --v for every open room, --t 1430 and --d Th to look at another time
#[poise::command(slash_command, prefix_command)]
pub async fn findroom(
    ctx: Context<'_>,
    #[description = "Building or room, plus optional --v, --t 1430, --d Th"]
    #[rest]
    query: Option<String>,
) -> CommandResult {
    let request = match FindRoomRequest::parse(query.as_deref().unwrap_or_default().split_whitespace())
    {
        Ok(request) => request,
        Err(e) => {
            ctx.send(
                poise::CreateReply::default()
                    .embed(create_error_embed(
                        &t!("rooms_invalid_args_title"),
                        &args_error_message(&e),
                    ))
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        }
    };

    let handle = get_room_finder_handle(ctx).await?;

    if handle.needs_scrape().await? {
        ctx.say(t!("rooms_scraping")).await?;
    }

    let timezone = {
        let config_read = ctx.data().config.read().await;
        parse_timezone(&config_read.timezone)?
    };
    let (now_day, now_time) = current_day_and_time(&timezone);
    let params = request.to_params(now_day, now_time);
    debug!("Room query from {}: {:?}", ctx.author().name, params);

    let outcome = handle.find_rooms(params.clone()).await?;
    let reply = render_reply(&outcome, &request, &params);

    for message in split_message(&reply, DISCORD_MESSAGE_LIMIT) {
        ctx.say(message).await?;
    }

    Ok(())
}

/// Scrape the class schedule again and replace the saved rooms
#[poise::command(slash_command, prefix_command, owners_only)]
pub async fn refreshrooms(ctx: Context<'_>) -> CommandResult {
    let response = ctx.say(t!("rooms_refreshing")).await?;

    let handle = get_room_finder_handle(ctx).await?;
    let result = handle.refresh().await;

    let _ = response.delete(ctx).await;

    match result {
        Ok(count) => {
            ctx.send(poise::CreateReply::default().embed(create_success_embed(
                &t!("rooms_refresh_title"),
                &t!("rooms_refresh_done", count = count.to_string()),
            )))
            .await?;
            Ok(())
        }
        Err(e) => {
            ctx.send(
                poise::CreateReply::default()
                    .embed(create_error_embed(
                        &t!("error_title", context = "refresh"),
                        &e.to_string(),
                    ))
                    .ephemeral(true),
            )
            .await?;
            Err(e)
        }
    }
}

/// User facing text for bad `findroom` arguments
fn args_error_message(error: &FindRoomArgsError) -> String {
    match error {
        FindRoomArgsError::InvalidTime(value) => t!("rooms_invalid_time", value = value).to_string(),
        FindRoomArgsError::InvalidDay(value) => {
            t!("rooms_invalid_day", value = value, days = WeekdayTag::list()).to_string()
        }
        FindRoomArgsError::MissingValue(flag) => t!("rooms_missing_value", flag = flag).to_string(),
    }
}

/// Look up the running Room Finder component
async fn get_room_finder_handle(ctx: Context<'_>) -> BotResult<RoomFinderHandle> {
    let component_manager = ctx
        .data()
        .component_manager
        .as_ref()
        .ok_or_else(|| component_error("Component manager not available"))?;

    let room_finder = component_manager
        .get_component_by_name("room_finder")
        .and_then(|component| component.as_any().downcast_ref::<RoomFinder>())
        .ok_or_else(|| component_error("Room finder is disabled"))?;

    room_finder
        .get_handle()
        .await
        .ok_or_else(|| component_error("Room finder is not initialized yet"))
}
