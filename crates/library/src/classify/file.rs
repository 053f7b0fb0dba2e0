use crate::Context;
use crate::artwork::resolve;
use crate::models::{CandidateFile, ExcludedFile, FailedFile, FailureReason, Outcome};
use crate::scan::ScannedFile;
use srm_config::ArtworkKind;
use srm_extract::{fuzzy, title_from_variable};
use srm_steam::assign;
use srm_template::error::EvalError;
use srm_template::{Ast, BindingEnvironment, MissingPolicy};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::instrument;

/// Classifies a single scanned file. Never fails: problems with the file
/// become [`Outcome::Failed`].
///
/// The steps run in a fixed order, and each only sees placeholders bound by
/// the steps before it:
///
/// 1. Title extraction, custom variable lookup and fuzzy normalization
///    (`title`, `extractedTitle`, `fuzzyTitle` and the `file*` placeholders).
/// 2. Executable and executable modifier (`exePath`, `exeDir`, `exeName`).
/// 3. The exclusion check. Excluded files stop here, before a custom
///    variable miss can fail them.
/// 4. Title modifier (`finalTitle`), arguments, start-in directory
///    (`startInDir`), categories, image pool and online queries.
/// 5. Identity, then artwork for every [`ArtworkKind`].
#[instrument(level = "debug", skip(ctx), fields(path = %file.path.display()))]
pub fn classify_file(ctx: &Context, file: &ScannedFile) -> Outcome {
    match classify_file_inner(ctx, file) {
        Ok(outcome) => outcome,
        Err(reason) => {
            tracing::debug!(%reason, "File failed classification");
            Outcome::Failed(FailedFile {
                file_path: file.path.clone(),
                reason,
            })
        },
    }
}

fn classify_file_inner(ctx: &Context, file: &ScannedFile) -> Result<Outcome, FailureReason> {
    let config = &ctx.config;
    let templates = &ctx.templates;
    let policy = ctx.missing_policy();
    let options = &config.title_from_variable;

    let extracted_title = ctx
        .rule
        .extract(&file.relative)
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty())
        .ok_or(FailureReason::NoTitle)?;
    // A variable miss only fails the file once it is known not to be excluded.
    let mut variable_missing = false;
    let title = if options.limit_to_groups.is_empty() {
        extracted_title.clone()
    } else {
        match title_from_variable(
            &ctx.custom_variables,
            &options.limit_to_groups,
            &extracted_title,
            options.case_insensitive_variables,
        ) {
            Some(title) => title,
            None => {
                variable_missing = options.skip_file_if_variable_was_not_found;
                extracted_title.clone()
            },
        }
    };
    let fuzzy_title = match fuzzy(&title, &config.fuzzy_match) {
        normalized if normalized.is_empty() => title.clone(),
        normalized => normalized,
    };

    let mut env = BindingEnvironment::clone(&ctx.scope);
    env.insert("title", title.as_str());
    env.insert("extractedTitle", extracted_title.as_str());
    env.insert("fuzzyTitle", fuzzy_title.as_str());
    bind_path(&mut env, "file", &file.path);

    let executable = render(&templates.executable_path, &env, policy)?;
    let executable = if executable.is_empty() {
        file.path.display().to_string()
    } else {
        executable
    };
    bind_path(&mut env, "exe", Path::new(&executable));
    let mut modified_executable_location = render(&templates.executable_modifier, &env, policy)?;

    let exclusion_key =
        ctx.exclusions.key(&modified_executable_location, &extracted_title, &config.parser_type.to_string());
    if ctx.exclusions.is_excluded(&exclusion_key) {
        tracing::debug!(key = %exclusion_key, "File excluded by user");
        return Ok(Outcome::Excluded(ExcludedFile {
            file_path: file.path.clone(),
            exclusion_key,
        }));
    }
    if variable_missing {
        return Err(FailureReason::VariableNotFound(extracted_title));
    }

    let final_title = render(&templates.title_modifier, &env, policy)?;
    if final_title.is_empty() {
        return Err(FailureReason::EmptyFinalTitle);
    }
    env.insert("finalTitle", final_title.as_str());

    let mut argument_string = render(&templates.executable_args, &env, policy)?;
    if config.executable.append_args_to_executable && !argument_string.is_empty() {
        modified_executable_location = format!("{modified_executable_location} {argument_string}");
        argument_string.clear();
    }
    let start_in_directory = match render(&templates.start_in_directory, &env, policy)? {
        directory if directory.is_empty() => env.get("exeDir").unwrap_or_default().to_string(),
        directory => directory,
    };
    env.insert("startInDir", start_in_directory.as_str());

    let mut steam_categories: Vec<String> = Vec::new();
    for template in &templates.steam_categories {
        let category = render(template, &env, policy)?;
        if !category.is_empty() && !steam_categories.contains(&category) {
            steam_categories.push(category);
        }
    }
    let image_pool = render(&templates.image_pool, &env, policy)?;
    let online_image_queries = ctx.queries.queries(&env, policy).map_err(unresolved)?;

    let identity = assign(&modified_executable_location, &final_title);

    let mut default_image = BTreeMap::new();
    let mut local_images = BTreeMap::new();
    let mut resolved_default_images = BTreeMap::new();
    let mut resolved_local_images = BTreeMap::new();
    for kind in ArtworkKind::ALL {
        let Some(asts) = templates.artwork.get(&kind) else {
            continue;
        };
        let artwork = resolve(kind, asts, &env, policy)?;
        default_image.insert(kind, artwork.default_image);
        local_images.insert(kind, artwork.local_images);
        resolved_default_images.insert(kind, artwork.resolved_default);
        resolved_local_images.insert(kind, artwork.resolved_local);
    }

    Ok(Outcome::Accepted(Box::new(CandidateFile {
        file_path: file.path.clone(),
        extracted_title,
        fuzzy_title,
        final_title,
        modified_executable_location,
        argument_string,
        start_in_directory,
        steam_categories,
        image_pool,
        online_image_queries,
        default_image,
        local_images,
        resolved_default_images,
        resolved_local_images,
        identity,
        exclusion_key,
    })))
}

fn unresolved(e: EvalError) -> FailureReason {
    FailureReason::from(&*e)
}

/// Evaluates and trims a template.
fn render(ast: &Ast, env: &BindingEnvironment, policy: MissingPolicy) -> Result<String, FailureReason> {
    Ok(ast.evaluate(env, policy).map_err(unresolved)?.trim().to_string())
}

/// Binds `{prefix}Path`, `{prefix}Dir`, `{prefix}Name` and, for files,
/// `fileStem` and `fileExtension` (with its leading dot).
fn bind_path(env: &mut BindingEnvironment, prefix: &str, path: &Path) {
    let lossy = |value: Option<&std::ffi::OsStr>| value.map(|v| v.to_string_lossy().into_owned()).unwrap_or_default();
    env.insert(format!("{prefix}Path"), path.display().to_string());
    env.insert(format!("{prefix}Dir"), path.parent().map(|p| p.display().to_string()).unwrap_or_default());
    env.insert(format!("{prefix}Name"), lossy(path.file_name()));
    if prefix == "file" {
        env.insert("fileStem", lossy(path.file_stem()));
        let extension = lossy(path.extension());
        env.insert("fileExtension", if extension.is_empty() { extension } else { format!(".{extension}") });
    }
}
