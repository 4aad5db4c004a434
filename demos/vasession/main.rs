// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use anyhow::Context as _;
use argh::FromArgs;

use cros_va_session::types::BufferType;
use cros_va_session::types::ConfigAttribType;
use cros_va_session::types::Profile;
use cros_va_session::types::RtFormat;
use cros_va_session::types::ATTRIB_NOT_SUPPORTED;
use cros_va_session::types::PROGRESSIVE;
use cros_va_session::Session;
use cros_va_session::SessionOptions;
use cros_va_session::VaDriver;

/// Lists the session capabilities and pushes a few pictures through a decode context.
#[derive(Debug, FromArgs)]
struct Args {
    /// profile to decode, e.g. mpeg2simple or VAProfileH264Main
    #[argh(option, default = "Profile::Mpeg2Simple")]
    profile: Profile,

    /// picture width
    #[argh(option, default = "352")]
    width: u32,

    /// picture height
    #[argh(option, default = "288")]
    height: u32,

    /// number of render target surfaces
    #[argh(option, default = "4")]
    surfaces: usize,

    /// number of pictures to submit
    #[argh(option, default = "8")]
    frames: usize,

    /// allow rendering into surfaces the context was not created with
    #[argh(switch)]
    permissive: bool,

    /// only print the capabilities
    #[argh(switch)]
    list: bool,
}

fn print_capabilities(driver: &impl VaDriver) -> anyhow::Result<()> {
    println!("vendor: {}", driver.vendor_string());
    for profile in driver.query_config_profiles() {
        for entrypoint in driver.query_config_entrypoints(profile) {
            let caps = driver.get_config_attributes(
                profile,
                entrypoint,
                &[ConfigAttribType::RT_FORMAT, ConfigAttribType::ENCRYPTION],
            )?;
            let supported: Vec<_> = caps
                .iter()
                .filter(|c| c.value != ATTRIB_NOT_SUPPORTED)
                .map(|c| format!("{:?}={:#x}", c.attrib_type, c.value))
                .collect();
            println!("  {:<32}: {:<24} {}", profile, entrypoint, supported.join(" "));
        }
    }
    Ok(())
}

fn run_pipeline(session: &mut Session, args: &Args) -> anyhow::Result<()> {
    let entrypoint = *session
        .query_config_entrypoints(args.profile)
        .first()
        .with_context(|| format!("{} has no entrypoint", args.profile))?;

    let config = session.create_config(args.profile, entrypoint, &[])?;
    let surfaces = session
        .create_surfaces(args.width, args.height, RtFormat::YUV420, args.surfaces)
        .context("creating surfaces")?;
    let context =
        session.create_context(config, args.width, args.height, PROGRESSIVE, &surfaces)?;

    for frame in 0..args.frames {
        let target = *surfaces.get(frame % surfaces.len().max(1)).context("no surfaces")?;
        let slice = session.create_buffer_with_data(BufferType::SliceData, 1, 4096, None)?;

        session.begin_picture(context, target)?;
        session.render_picture(context, &[slice])?;
        session.end_picture(context)?;
        session.sync_surface(context, target)?;
        println!(
            "frame {:>3}: surface {} {:?}",
            frame,
            target,
            session.query_surface_status(context, target)?
        );

        session.destroy_buffer(slice)?;
    }

    session.destroy_context(context)?;
    session.destroy_surfaces(&surfaces)?;
    session.destroy_config(config)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Args = argh::from_env();

    let options =
        SessionOptions { permissive_render_targets: args.permissive, ..Default::default() };
    let mut session = Session::with_options(options);

    print_capabilities(&session)?;
    if !args.list {
        run_pipeline(&mut session, &args)?;
    }

    session.terminate();
    Ok(())
}
