//! In-process PlantUML running on an embedded JVM.
//!
//! Mirrors what the engine does for a single `-pipe` run, minus the final
//! `System.exit`: build an `Option` from the arguments, read the source with
//! a `SourceStringReader`, and generate the first image into a
//! `ByteArrayOutputStream`.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use jni::{
    InitArgsBuilder, JNIEnv, JNIVersion, JavaVM,
    errors::Error as JniError,
    objects::{JByteArray, JObject, JString, JValue},
};
use log::{debug, info};

use crate::{
    error::{RenderError, UmlBlockError},
    render::{Engine, EngineOptions, check_description},
};

/// A process can host a single JVM; it is created on first use and shared.
/// The jar it was started with is kept alongside it.
static JVM: Mutex<Option<(PathBuf, Arc<JavaVM>)>> = Mutex::new(None);

const GENERATE_IMAGE_SIG: &str =
    "(Ljava/io/OutputStream;ILnet/sourceforge/plantuml/FileFormatOption;)Ljava/lang/String;";
const READER_CTOR_SIG: &str =
    "(Lnet/sourceforge/plantuml/preproc/Defines;Ljava/lang/String;Ljava/util/List;)V";

/// [`Engine`] backed by the PlantUML jar loaded into an embedded JVM.
#[derive(Clone)]
pub struct JvmEngine {
    vm: Arc<JavaVM>,
}

impl JvmEngine {
    /// Starts the JVM with `jar` on the class path, or reuses the running one.
    ///
    /// # Errors
    ///
    /// Returns [`UmlBlockError::Config`] if the jar does not exist, the JVM
    /// cannot be started, or the running JVM was started with another jar.
    pub fn new(jar: &Path) -> Result<Self, UmlBlockError> {
        let mut slot = JVM
            .lock()
            .map_err(|_| UmlBlockError::config("embedded JVM state is poisoned"))?;
        if let Some((running, vm)) = slot.as_ref() {
            ensure_same_jar(running, jar)?;
            debug!(jar = running.display().to_string(); "Reusing embedded JVM");
            return Ok(Self {
                vm: Arc::clone(vm),
            });
        }

        if !jar.is_file() {
            return Err(UmlBlockError::config(format!(
                "PlantUML jar not found at `{}`",
                jar.display()
            )));
        }

        info!(jar = jar.display().to_string(); "Starting embedded JVM");
        let class_path = format!("-Djava.class.path={}", jar.display());
        let args = InitArgsBuilder::new()
            .version(JNIVersion::V8)
            .option(class_path.as_str())
            .option("-Djava.awt.headless=true")
            .build()
            .map_err(|err| UmlBlockError::config(format!("invalid JVM options: {err}")))?;
        let vm = JavaVM::new(args)
            .map_err(|err| UmlBlockError::config(format!("failed to start the JVM: {err}")))?;

        let vm = Arc::new(vm);
        *slot = Some((jar.to_path_buf(), Arc::clone(&vm)));
        Ok(Self { vm })
    }
}

impl std::fmt::Debug for JvmEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JvmEngine").finish_non_exhaustive()
    }
}

impl Engine for JvmEngine {
    fn generate(
        &self,
        source: &str,
        options: &EngineOptions,
        sink: &mut dyn Write,
    ) -> Result<(), RenderError> {
        let mut env = self
            .vm
            .attach_current_thread()
            .map_err(|err| RenderError::Engine(format!("failed to attach to the JVM: {err}")))?;

        let generated = env.with_local_frame(32, |env| generate_image(env, source, options));
        let (description, bytes) = match generated {
            Ok(generated) => generated,
            Err(err) => return Err(engine_error(&mut env, err)),
        };
        check_description(description.as_deref())?;

        sink.write_all(&bytes)
            .map_err(|err| RenderError::Engine(format!("failed to write engine output: {err}")))
    }
}

/// Runs the engine and returns the diagram description with the image bytes.
fn generate_image(
    env: &mut JNIEnv,
    source: &str,
    options: &EngineOptions,
) -> Result<(Option<String>, Vec<u8>), JniError> {
    let string_class = env.find_class("java/lang/String")?;
    let args = env.new_object_array(options.args().len() as i32, &string_class, JObject::null())?;
    for (idx, arg) in options.args().iter().enumerate() {
        let value = env.new_string(arg)?;
        env.set_object_array_element(&args, idx as i32, &value)?;
    }

    let option = env.new_object(
        "net/sourceforge/plantuml/Option",
        "([Ljava/lang/String;)V",
        &[JValue::Object(&*args)],
    )?;
    let config = env
        .call_method(&option, "getConfig", "()Ljava/util/List;", &[])?
        .l()?;
    let file_format = env
        .call_method(
            &option,
            "getFileFormatOption",
            "()Lnet/sourceforge/plantuml/FileFormatOption;",
            &[],
        )?
        .l()?;

    let defines = env.new_object("net/sourceforge/plantuml/preproc/Defines", "()V", &[])?;
    let code = env.new_string(source)?;
    let reader = env.new_object(
        "net/sourceforge/plantuml/SourceStringReader",
        READER_CTOR_SIG,
        &[
            JValue::Object(&defines),
            JValue::Object(&*code),
            JValue::Object(&config),
        ],
    )?;

    let buffer = env.new_object("java/io/ByteArrayOutputStream", "()V", &[])?;
    let stream = env.new_object(
        "java/io/PrintStream",
        "(Ljava/io/OutputStream;)V",
        &[JValue::Object(&buffer)],
    )?;
    let description = env
        .call_method(
            &reader,
            "generateImage",
            GENERATE_IMAGE_SIG,
            &[
                JValue::Object(&stream),
                JValue::Int(0),
                JValue::Object(&file_format),
            ],
        )?
        .l()?;
    env.call_method(&stream, "close", "()V", &[])?;

    let description = if description.is_null() {
        None
    } else {
        let description = JString::from(description);
        let text: String = env.get_string(&description)?.into();
        Some(text)
    };

    let bytes = env.call_method(&buffer, "toByteArray", "()[B", &[])?.l()?;
    let bytes = env.convert_byte_array(JByteArray::from(bytes))?;
    Ok((description, bytes))
}

/// Checks that a jar matches the one the running JVM was started with.
///
/// Paths are compared after resolving them on disk, when possible.
fn ensure_same_jar(running: &Path, requested: &Path) -> Result<(), UmlBlockError> {
    let resolve = |path: &Path| fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if resolve(running) == resolve(requested) {
        return Ok(());
    }
    Err(UmlBlockError::config(format!(
        "the embedded JVM is already running with `{}`; it cannot load `{}`",
        running.display(),
        requested.display()
    )))
}

/// Converts a JNI failure into a [`RenderError`], clearing and describing any
/// pending Java exception.
fn engine_error(env: &mut JNIEnv, err: JniError) -> RenderError {
    if matches!(err, JniError::JavaException) {
        if let Some(message) = take_exception_message(env) {
            return RenderError::Engine(message);
        }
    }
    RenderError::Engine(err.to_string())
}

fn take_exception_message(env: &mut JNIEnv) -> Option<String> {
    let throwable = env.exception_occurred().ok()?;
    env.exception_clear().ok()?;
    let text = env
        .call_method(&throwable, "toString", "()Ljava/lang/String;", &[])
        .and_then(|value| value.l())
        .ok()?;
    let text = JString::from(text);
    let message = env.get_string(&text).ok()?;
    Some(message.into())
}
