//! Install-time scaffolding.
//!
//! Drops the TypeScript rendition of the resolver into a target Vite
//! project, splices its registration into `vite.config.ts`, and (via the
//! synthesizer) can pre-create a tsconfig for a chosen directory. One-shot
//! by design: every step detects prior installation and backs off.

use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::search::to_unix;

pub const PLUGIN_NAME: &str = "vite-plugin-path-alias";
pub const PLUGIN_RELATIVE_PATH: &str = "vite-plugins/vite-plugin-path-alias.ts";

const IMPORT_LINE: &str =
    "import pathAliasPlugin from './vite-plugins/vite-plugin-path-alias'";
const CALL_LINE: &str = "pathAliasPlugin(),";

/// The plugin source installed into target projects. Same semantics as
/// the Rust resolver: sentinel gating, downward-then-upward search, and
/// tsconfig creation detached from the resolution result.
const PLUGIN_SOURCE: &str = r#"
import { type Plugin } from 'vite'
import * as path from 'path'
import { existsSync, statSync, writeFileSync } from 'fs'

const FILE_TYPE_LIST: `.${string}`[] = [
  '.ts', '.d.ts', '.tsx', '.js', '.jsx', '.vue',
]

const toUnix = (p: string) => p.replace(/\\/g, '/')

/** Nearest base path for the alias, searching startDir and then each ancestor. */
const findDirectory = (currentDir: string, alias: string): string | null => {
  const fullPath = path.join(currentDir, alias)

  if (existsSync(fullPath) && statSync(fullPath).isDirectory()) {
    return fullPath
  }

  for (const fileType of FILE_TYPE_LIST) {
    if (existsSync(fullPath + fileType)) return fullPath
  }

  const parentDir = path.dirname(currentDir)
  if (parentDir === currentDir) {
    return null
  }
  return findDirectory(parentDir, alias)
}

/** Nearest ancestor that contains the alias; anchors the generated tsconfig. */
const findFolderUpwards = (startPath: string, alias: string): string | null => {
  let currentPath = path.posix.normalize(startPath)

  while (currentPath !== path.parse(currentPath).root) {
    const folderPath = path.join(currentPath, alias)

    if (existsSync(folderPath) && statSync(folderPath).isDirectory()) {
      return currentPath
    }

    for (const fileType of FILE_TYPE_LIST) {
      if (existsSync(folderPath + fileType)) {
        return currentPath
      }
    }

    currentPath = path.dirname(currentPath)
  }

  return null
}

const createTsConfigFile = (tsconfigDir: string, scoped: string, alias: string) => {
  const tsconfigFullPath = `${tsconfigDir}/tsconfig.json`

  if (existsSync(tsconfigFullPath)) return

  const segments = tsconfigFullPath.split(scoped)[1]
  if (segments === undefined) return

  const length = segments.split('/').filter(Boolean).length - 1
  if (length < 1) return

  const data = {
    extends:
      Array.from({ length })
        .map(() => '..')
        .join('/') + '/tsconfig.json',
    compilerOptions: {
      baseUrl: '.',
      paths: {
        [`$${alias}/*`]: [`./${alias}/*`],
        '@/*': [
          length === 1
            ? './*'
            : Array.from({ length: length - 1 })
                .map(() => '..')
                .join('/') + '/*',
        ],
      },
    },
  }

  writeFileSync(path.resolve(tsconfigFullPath), JSON.stringify(data, null, 2))
}

export default function pathAliasPlugin({ scoped = '/src' } = {}): Plugin {
  return {
    name: 'vite-plugin-path-alias',

    resolveId(source: string, importer) {
      if (!source.startsWith('$') || !importer?.includes(scoped)) {
        return null
      }

      const [alias, ...rest] = source.replace('$', '').split('/')
      if (!alias) return null

      const importerDir = path.dirname(importer)
      const prefixPath = findDirectory(importerDir, alias)
      if (!prefixPath) return null

      const prefixPathUnix = toUnix(prefixPath)
      const fullPath = rest.length === 0 ? prefixPathUnix : `${prefixPathUnix}/${rest.join('/')}`

      let completedPath: string | null = null
      if (existsSync(fullPath)) {
        completedPath = fullPath
      } else {
        for (const fileType of FILE_TYPE_LIST) {
          if (existsSync(fullPath + fileType)) {
            completedPath = fullPath + fileType
            break
          }
        }
      }
      if (!completedPath) return null

      const tsconfigDir = findFolderUpwards(importerDir, alias)
      if (tsconfigDir) {
        try {
          createTsConfigFile(toUnix(tsconfigDir), scoped, alias)
        } catch (e) {
          console.warn(`[vite-plugin-path-alias] tsconfig generation failed: ${e}`)
        }
      }

      return completedPath
    },
  }
}
"#;

#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("no 'plugins:' field found in {0}")]
    NoPluginsField(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaffoldAction {
    Created(PathBuf),
    AlreadyExists(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Injection {
    Injected,
    AlreadyInjected,
}

/// Create `path` with `contents` unless it already exists. Parent
/// directories are created as needed. Returns whether a write happened.
pub fn ensure_file(path: &Path, contents: &str) -> io::Result<bool> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    if path.exists() {
        return Ok(false);
    }
    fs::write(path, contents)?;
    Ok(true)
}

/// Install the plugin source under `vite-plugins/` in the project.
pub fn write_plugin(project_root: &Path) -> Result<ScaffoldAction, ScaffoldError> {
    let target = project_root.join(PLUGIN_RELATIVE_PATH);
    if ensure_file(&target, PLUGIN_SOURCE.trim_start())? {
        Ok(ScaffoldAction::Created(target))
    } else {
        Ok(ScaffoldAction::AlreadyExists(target))
    }
}

/// Splice the import line and the registration call into a Vite config.
/// The call lands on the line after the `plugins:` field; the import goes
/// on top. A config that already mentions the plugin is left alone.
pub fn inject_plugin(vite_config: &Path) -> Result<Injection, ScaffoldError> {
    let content = fs::read_to_string(vite_config)?;
    if content.contains(PLUGIN_NAME) {
        return Ok(Injection::AlreadyInjected);
    }

    let anchor = Regex::new(r"(?m)^\s*plugins\s*:").unwrap();
    let m = anchor
        .find(&content)
        .ok_or_else(|| ScaffoldError::NoPluginsField(to_unix(vite_config)))?;
    let plugins_line = content[..m.start()].matches('\n').count();

    let mut out: Vec<String> = Vec::new();
    out.push(IMPORT_LINE.to_string());
    for (i, line) in content.lines().enumerate() {
        out.push(line.to_string());
        if i == plugins_line {
            out.push(format!("    {CALL_LINE}"));
        }
    }
    fs::write(vite_config, out.join("\n") + "\n")?;
    Ok(Injection::Injected)
}
