//! Purpose: Execute parsed CLI subcommands against the local store and the codec.
//! Role: Keeps `main.rs` focused on bootstrap and error emission.
use super::*;

use quickmenu::api::{
    DecodeOutcome, LocalStore, MenuItemDraft, MenuItemPatch, QR_BYTE_CAPACITY, StallInfo, decode,
    encode, fragment_from_input, parse_category, parse_price, share_url,
};
use quickmenu::core::menu_file::now_rfc3339;
use quickmenu::notice::qr_capacity_notice;
use url::Url;

pub(super) fn dispatch_command(
    command: Command,
    menu_dir: PathBuf,
    vendor: String,
    color_mode: ColorMode,
) -> Result<RunOutcome, Error> {
    let store = LocalStore::new().with_menu_dir(menu_dir);
    match command {
        Command::Init => {
            let outcome = store.initialize(&vendor)?;
            emit_json(json!({
                "vendor": vendor,
                "created": outcome.created,
                "path": outcome.path.display().to_string(),
                "menu": to_json(&outcome.document)?,
            }));
            Ok(RunOutcome::ok())
        }
        Command::Show => {
            let document = store.require(&vendor)?;
            emit_json(to_json(&document)?);
            Ok(RunOutcome::ok())
        }
        Command::Vendors => {
            let vendors = store.list_vendors()?;
            emit_json(json!({ "vendors": vendors }));
            Ok(RunOutcome::ok())
        }
        Command::Stall { name, wait } => {
            let stall = match wait {
                Some(minutes) => store
                    .save_settings(&vendor, StallInfo::new(name).with_wait_minutes(minutes))?,
                None => store.save_stall_name(&vendor, &name)?,
            };
            emit_json(json!({ "vendor": vendor, "stall": to_json(&stall)? }));
            Ok(RunOutcome::ok())
        }
        Command::Add {
            name,
            price,
            description,
            category,
            non_veg,
            sold_out,
        } => {
            let price = parse_price(&price).map_err(|issue| issue.into_error())?;
            let mut draft = MenuItemDraft::new(name, price)
                .veg(!non_veg)
                .available(!sold_out);
            if let Some(description) = description {
                draft = draft.description(description);
            }
            if let Some(category) = category {
                let category = parse_category(&category).map_err(|issue| issue.into_error())?;
                draft = draft.category(category);
            }
            let item = store.add_item(&vendor, draft)?;
            emit_json(json!({ "vendor": vendor, "item": to_json(&item)? }));
            Ok(RunOutcome::ok())
        }
        Command::Update {
            id,
            name,
            price,
            description,
            category,
            veg,
            non_veg,
            available,
            sold_out,
        } => {
            let patch = MenuItemPatch {
                name,
                price: price
                    .map(|text| parse_price(&text))
                    .transpose()
                    .map_err(|issue| issue.into_error())?,
                description,
                category: category
                    .map(|label| parse_category(&label))
                    .transpose()
                    .map_err(|issue| issue.into_error())?,
                is_veg: flag_pair(veg, non_veg),
                is_available: flag_pair(available, sold_out),
            };
            let item = store.update_item(&vendor, &id, patch)?;
            emit_json(json!({ "vendor": vendor, "item": to_json(&item)? }));
            Ok(RunOutcome::ok())
        }
        Command::Remove { item } => {
            let removed = store.remove_item(&vendor, &item)?;
            emit_json(json!({ "vendor": vendor, "removed": to_json(&removed)? }));
            Ok(RunOutcome::ok())
        }
        Command::Encode { base_url } => {
            let document = store.require(&vendor)?;
            if document.items.is_empty() {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message("menu has no items to encode")
                    .with_hint("Add items with `quickmenu add` first."));
            }
            let base = base_url
                .map(|raw| {
                    Url::parse(&raw).map_err(|err| {
                        Error::new(ErrorKind::Usage)
                            .with_message(format!("invalid --base-url: {raw}"))
                            .with_hint("Use an absolute URL such as https://menu.example/.")
                            .with_source(err)
                    })
                })
                .transpose()?;

            let fragment = encode(&document.items, Some(&document.stall()))?;
            let url = base.map(|base| share_url(&base, &fragment));
            let length = url.as_ref().map_or(fragment.len(), String::len);

            let time = now_rfc3339().unwrap_or_default();
            if let Some(notice) = qr_capacity_notice(&vendor, time, length) {
                emit_notice(&notice, color_mode);
            }

            let mut output = Map::new();
            output.insert("vendor".to_string(), json!(vendor));
            output.insert("items".to_string(), json!(document.items.len()));
            output.insert("fragment".to_string(), json!(fragment));
            if let Some(url) = url {
                output.insert("url".to_string(), json!(url));
            }
            output.insert("length".to_string(), json!(length));
            output.insert("capacity".to_string(), json!(QR_BYTE_CAPACITY));
            emit_json(Value::Object(output));
            Ok(RunOutcome::ok())
        }
        Command::Decode { input } => {
            let fragment = fragment_from_input(&input);
            let output = match decode(&fragment)? {
                DecodeOutcome::Menu(menu) => json!({
                    "mode": "menu",
                    "format": menu.format.as_str(),
                    "stall": to_json(&menu.stall)?,
                    "items": to_json(&menu.items)?,
                }),
                DecodeOutcome::ViewWithoutData => json!({ "mode": "empty" }),
                DecodeOutcome::NotViewRoute => json!({ "mode": "editor" }),
            };
            emit_json(output);
            Ok(RunOutcome::ok())
        }
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "quickmenu", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
    }
}

fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}
