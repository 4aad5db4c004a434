// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::capabilities;
use crate::session::Session;
use crate::status::VaError;
use crate::status::VaResult;
use crate::types::ConfigAttrib;
use crate::types::ConfigAttribType;
use crate::types::Entrypoint;
use crate::types::Profile;
use crate::types::RtFormat;
use crate::ConfigId;

/// A validated profile/entrypoint pair and the attributes it was created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectConfig {
    pub profile: Profile,
    pub entrypoint: Entrypoint,
    // Insertion order, one entry per attribute type.
    pub attribs: Vec<ConfigAttrib>,
}

impl ObjectConfig {
    fn new(profile: Profile, entrypoint: Entrypoint) -> Self {
        Self { profile, entrypoint, attribs: Vec::new() }
    }

    fn update_attribute(&mut self, attrib: ConfigAttrib, max: usize) -> VaResult<()> {
        if let Some(existing) =
            self.attribs.iter_mut().find(|a| a.attrib_type == attrib.attrib_type)
        {
            existing.value = attrib.value;
            return Ok(());
        }
        if self.attribs.len() >= max {
            return Err(VaError::AttributeCapacityExceeded { max });
        }
        self.attribs.push(attrib);
        Ok(())
    }

    pub fn attribute(&self, attrib_type: ConfigAttribType) -> Option<u32> {
        self.attribs.iter().find(|a| a.attrib_type == attrib_type).map(|a| a.value)
    }
}

impl Session {
    /// Creates a config for `profile`/`entrypoint`. The render target format attribute is
    /// seeded with YUV420, then `attribs` are applied in order, a repeated type overwriting the
    /// earlier value.
    pub fn create_config(
        &mut self,
        profile: Profile,
        entrypoint: Entrypoint,
        attribs: &[ConfigAttrib],
    ) -> VaResult<ConfigId> {
        if !capabilities::is_supported(profile, entrypoint) {
            return Err(VaError::UnsupportedProfileOrEntrypoint { profile, entrypoint });
        }

        let id = self.configs.insert(ObjectConfig::new(profile, entrypoint))?;
        let max = self.options.max_config_attributes;
        let config = self.configs.lookup_mut(id).ok_or(VaError::InvalidConfig(id.raw()))?;
        let seed = ConfigAttrib::new(ConfigAttribType::RT_FORMAT, RtFormat::YUV420.0);
        let applied = std::iter::once(&seed)
            .chain(attribs)
            .try_for_each(|attrib| config.update_attribute(*attrib, max));

        if let Err(e) = applied {
            self.configs.free(id);
            return Err(e);
        }

        log::debug!("created config {} for {}/{}", id, profile, entrypoint);
        Ok(id)
    }

    /// Destroys a config. Contexts created from it keep working; they only hold its handle.
    pub fn destroy_config(&mut self, config: ConfigId) -> VaResult<()> {
        self.config(config)?;

        let users = self.contexts.iter().filter(|(_, context)| context.config == config).count();
        if users > 0 {
            log::warn!("destroying config {} still used by {} context(s)", config, users);
        }

        self.configs.free(config);
        log::debug!("destroyed config {}", config);
        Ok(())
    }

    pub fn get_config_attributes(
        &self,
        config: ConfigId,
    ) -> VaResult<(Profile, Entrypoint, Vec<ConfigAttrib>)> {
        let config = self.config(config)?;
        Ok((config.profile, config.entrypoint, config.attribs.clone()))
    }

    /// Reports the value the driver supports for each attribute type in `types`.
    pub fn get_attribute_capabilities(
        &self,
        profile: Profile,
        entrypoint: Entrypoint,
        types: &[ConfigAttribType],
    ) -> VaResult<Vec<ConfigAttrib>> {
        if !capabilities::is_supported(profile, entrypoint) {
            return Err(VaError::UnsupportedProfileOrEntrypoint { profile, entrypoint });
        }
        Ok(types
            .iter()
            .map(|&attrib_type| {
                let value = capabilities::attribute_capability(profile, entrypoint, attrib_type);
                ConfigAttrib::new(attrib_type, value)
            })
            .collect())
    }

    pub fn num_configs(&self) -> usize {
        self.configs.len()
    }
}
